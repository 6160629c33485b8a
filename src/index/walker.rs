//! Registry walker.
//!
//! Visits every folder of `stacks/` and builds one stack entry per folder.
//! A folder with a `stack.yaml` is a versioned stack: each declared local
//! version lives in a subfolder named after its identifier. A folder without
//! one is a legacy stack holding a single, default version at its root.

use std::path::Path;

use log::{debug, info};

use crate::config::{STACKS_DIR, STACK_MANIFEST};
use crate::error::{Error, Result};
use crate::filesystem::{file_exists, join_within, list_subdirs};
use crate::index::merge::{merge_version, MergedVersion};
use crate::index::validation::{check_entry, validate_manifest};
use crate::index::BuildContext;
use crate::schema::{CatalogEntry, StackEntry, StackManifest, VersionEntry};

/// Builds a catalog entry for every stack folder under `<registry>/stacks`,
/// in folder-name order. The first failure aborts the walk.
pub fn walk_stacks(registry: &Path, ctx: &BuildContext<'_>) -> Result<Vec<CatalogEntry>> {
    let stacks_dir = registry.join(STACKS_DIR);
    let mut entries = Vec::new();

    for (stack_name, stack_dir) in list_subdirs(&stacks_dir)? {
        let manifest_path = stack_dir.join(STACK_MANIFEST);
        let stack = if file_exists(&manifest_path) {
            info!("Indexing versioned stack {}", stack_name);
            build_versioned_stack(ctx, &stack_name, &stack_dir, &manifest_path)?
        } else {
            info!("Indexing stack {}", stack_name);
            build_legacy_stack(ctx, &stack_name, &stack_dir)?
        };

        let entry = CatalogEntry::Stack(stack);
        if !ctx.config.force {
            check_entry(&entry)?;
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Builds a stack declared by `stack.yaml`.
pub fn build_versioned_stack(
    ctx: &BuildContext<'_>,
    stack_name: &str,
    stack_dir: &Path,
    manifest_path: &Path,
) -> Result<StackEntry> {
    let manifest = StackManifest::from_file(manifest_path)?;
    if !ctx.config.force {
        validate_manifest(&manifest, stack_name, stack_dir)?;
    }

    let mut stack = StackEntry::from_manifest(manifest);
    let declared = std::mem::take(&mut stack.versions);
    let mut versions = Vec::with_capacity(declared.len());

    for version in declared {
        if version.is_remote() {
            // remote versions are only materialized by the fetcher
            debug!("{} version {} is remote, skipping", stack_name, version.version);
            versions.push(version);
            continue;
        }
        let version_dir =
            join_within(stack_dir, &version.version).map_err(|e| Error::InvalidManifest {
                stack: stack_name.to_string(),
                problems: vec![format!("version {}: {}", version.version, e)],
            })?;
        let MergedVersion {
            stack: merged,
            version,
        } = merge_version(ctx, &version_dir, stack_name, version, stack)?;
        stack = merged;
        versions.push(version);
    }

    stack.versions = versions;
    Ok(stack)
}

/// Builds a stack without `stack.yaml`: the folder itself is the only,
/// default version.
pub fn build_legacy_stack(
    ctx: &BuildContext<'_>,
    stack_name: &str,
    stack_dir: &Path,
) -> Result<StackEntry> {
    let declared = VersionEntry {
        default: true,
        ..VersionEntry::default()
    };
    let MergedVersion { mut stack, version } =
        merge_version(ctx, stack_dir, stack_name, declared, StackEntry::default())?;
    stack.versions.push(version);
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndexConfig, DEVFILE};
    use crate::devfile::SchemaVersionValidator;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn devfile(name: &str, version: &str) -> String {
        format!(
            "schemaVersion: 2.2.0\nmetadata:\n  name: {name}\n  version: {version}\n  displayName: {name}\n  language: {name}\n  projectType: {name}\n  provider: Red Hat\n  supportUrl: https://example.com\n  architectures: [amd64]\n"
        )
    }

    fn context(config: &IndexConfig) -> BuildContext<'_> {
        BuildContext {
            config,
            validator: &SchemaVersionValidator,
        }
    }

    #[test]
    fn test_walk_requires_stacks_dir() {
        let temp = TempDir::new().unwrap();
        let config = IndexConfig::default();
        let err = walk_stacks(temp.path(), &context(&config)).unwrap_err();
        assert!(matches!(err, Error::ReadFile { .. }));
    }

    #[test]
    fn test_walk_skips_plain_files() {
        let temp = TempDir::new().unwrap();
        let stacks = temp.path().join(STACKS_DIR);
        fs::create_dir_all(stacks.join("go")).unwrap();
        fs::write(stacks.join("go").join(DEVFILE), devfile("go", "1.0.0")).unwrap();
        fs::write(stacks.join("README.md"), "# stacks").unwrap();

        let config = IndexConfig::default();
        let entries = walk_stacks(temp.path(), &context(&config)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "go");
    }

    #[test]
    fn test_legacy_stack_has_single_default_version() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEVFILE), devfile("python", "2.1.0")).unwrap();

        let config = IndexConfig::default();
        let stack = build_legacy_stack(&context(&config), "python", temp.path()).unwrap();
        assert_eq!(stack.versions.len(), 1);
        assert!(stack.versions[0].default);
        assert_eq!(stack.versions[0].version, "2.1.0");
        assert_eq!(
            stack.versions[0].links["self"],
            "devfile-catalog/python:2.1.0"
        );
    }

    #[test]
    fn test_versioned_stack_keeps_remote_versions_unpopulated() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("1.0.0")).unwrap();
        fs::write(
            temp.path().join("1.0.0").join(DEVFILE),
            devfile("java-maven", "1.0.0"),
        )
        .unwrap();
        let manifest = temp.path().join(STACK_MANIFEST);
        fs::write(
            &manifest,
            r#"
name: java-maven
displayName: Maven Java
icon: maven.svg
versions:
  - version: 1.0.0
    default: true
  - version: 2.0.0
    git:
      url: https://github.com/devfile/registry.git
      revision: main
      subDir: stacks/java-maven/2.0.0
"#,
        )
        .unwrap();

        let config = IndexConfig::default();
        let stack =
            build_versioned_stack(&context(&config), "java-maven", temp.path(), &manifest).unwrap();
        assert_eq!(stack.versions.len(), 2);
        assert!(stack.versions[1].is_remote());
        assert!(stack.versions[1].links.is_empty());
        assert!(stack.versions[1].resources.is_empty());
        assert_eq!(stack.meta.display_name, "Maven Java");
    }

    #[test]
    fn test_versioned_stack_rejects_version_outside_stack() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join(DEVFILE), devfile("host", "1.0.0")).unwrap();

        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join(STACK_MANIFEST);
        fs::write(
            &manifest,
            format!(
                "name: go\ndisplayName: Go\nicon: go.svg\nversions:\n  - version: {}\n    default: true\n",
                outside.path().display()
            ),
        )
        .unwrap();

        // forced builds skip manifest checks but must still stay in the stack
        let config = IndexConfig::with_force(true);
        let err = build_versioned_stack(&context(&config), "go", temp.path(), &manifest).unwrap_err();
        match err {
            Error::InvalidManifest { stack, problems } => {
                assert_eq!(stack, "go");
                assert!(problems[0].contains("is not a relative path"), "{:?}", problems);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_versioned_stack_manifest_errors_are_fatal() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join(STACK_MANIFEST);
        fs::write(&manifest, "name: broken\nversions: []\n").unwrap();

        let config = IndexConfig::default();
        let err =
            build_versioned_stack(&context(&config), "broken", temp.path(), &manifest).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest { .. }));
    }
}
