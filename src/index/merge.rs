//! Version merge engine.
//!
//! Reads the devfile of one version directory, fills in the version entry
//! and folds the version's metadata into its stack entry:
//!
//! - stack-level scalars are backfilled only while still empty, so the first
//!   version processed wins;
//! - tags and architectures are unioned, keeping first-appearance order.
//!
//! The stack entry is taken by value and handed back updated.

use std::path::Path;

use log::debug;

use crate::config::LATEST_VERSION;
use crate::devfile::{locate_devfile, validate_devfile, Devfile, DevfileMetadata};
use crate::error::Result;
use crate::filesystem::list_files;
use crate::index::BuildContext;
use crate::schema::{union_into, EntryMeta, StackEntry, VersionEntry};

/// Result of merging one version into its stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedVersion {
    pub stack: StackEntry,
    pub version: VersionEntry,
}

fn backfill(slot: &mut String, value: &str) {
    if slot.is_empty() {
        *slot = value.to_string();
    }
}

/// Applies one version's devfile metadata to the stack-level fields.
pub fn backfill_meta(mut meta: EntryMeta, devfile: &DevfileMetadata) -> EntryMeta {
    backfill(&mut meta.project_type, &devfile.project_type);
    backfill(&mut meta.language, &devfile.language);
    backfill(&mut meta.provider, &devfile.provider);
    backfill(&mut meta.support_url, &devfile.support_url);
    backfill(&mut meta.name, &devfile.name);
    backfill(&mut meta.display_name, &devfile.display_name);
    backfill(&mut meta.description, &devfile.description);
    backfill(&mut meta.icon, &devfile.icon);
    union_into(&mut meta.tags, &devfile.tags);
    union_into(&mut meta.architectures, &devfile.architectures);
    meta
}

/// Merges the version stored in `version_dir` into `stack`.
///
/// `declared` carries what the layout knows about the version (identifier
/// and default flag); `stack_name` is the stack's folder name, used for the
/// `self` link.
pub fn merge_version(
    ctx: &BuildContext<'_>,
    version_dir: &Path,
    stack_name: &str,
    declared: VersionEntry,
    stack: StackEntry,
) -> Result<MergedVersion> {
    let devfile_path = locate_devfile(version_dir)?;
    if !ctx.config.force {
        validate_devfile(ctx.validator, &devfile_path, version_dir)?;
    }

    let devfile = Devfile::from_file(&devfile_path)?;
    let metadata = &devfile.metadata;

    let version_id = [declared.version.as_str(), metadata.version.as_str()]
        .into_iter()
        .find(|v| !v.is_empty())
        .unwrap_or(LATEST_VERSION)
        .to_string();
    debug!(
        "merging {} version {} from {}",
        stack_name,
        version_id,
        devfile_path.display()
    );

    let mut links = declared.links;
    links.insert("self".to_string(), ctx.config.self_link(stack_name, &version_id));

    let version = VersionEntry {
        version: version_id,
        schema_version: devfile.schema_version.clone(),
        default: declared.default,
        git: None,
        description: metadata.description.clone(),
        tags: metadata.tags.clone(),
        architectures: metadata.architectures.clone(),
        icon: metadata.icon.clone(),
        links,
        resources: list_files(version_dir)?,
        starter_projects: devfile.starter_project_names(),
    };

    let stack = StackEntry {
        meta: backfill_meta(stack.meta, metadata),
        versions: stack.versions,
    };
    Ok(MergedVersion { stack, version })
}
