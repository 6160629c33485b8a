//! Validation policy for finished catalog entries and for `stack.yaml`
//! manifests.
//!
//! Entry checks distinguish hard violations, which abort the build, from
//! soft ones ([`Warning`]) which are only reported. Manifest checks are all
//! hard and accumulate every problem of a manifest into one error.

use std::fmt;
use std::path::Path;

use log::warn;

use crate::error::{Error, Result};
use crate::filesystem::{dir_exists, join_within};
use crate::schema::{CatalogEntry, EntryMeta, StackManifest};

/// A completeness problem that is reported but never fails the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    MissingProvider { entry: String },
    MissingSupportUrl { entry: String },
    MissingArchitectures { entry: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingProvider { entry } => {
                write!(f, "the {} devfile has no provider mentioned", entry)
            }
            Warning::MissingSupportUrl { entry } => {
                write!(f, "the {} devfile has no supportUrl mentioned", entry)
            }
            Warning::MissingArchitectures { entry } => {
                write!(f, "the {} devfile has no architecture(s) mentioned", entry)
            }
        }
    }
}

fn invalid(meta: &EntryMeta, message: &str) -> Error {
    Error::InvalidEntry {
        name: meta.name.clone(),
        message: message.to_string(),
    }
}

/// Checks a finished entry. Hard violations are returned as the error;
/// soft ones as the list of warnings.
pub fn validate_entry(entry: &CatalogEntry) -> Result<Vec<Warning>> {
    let meta = entry.meta();
    match entry {
        CatalogEntry::Stack(stack) => {
            if meta.name.is_empty() {
                return Err(invalid(meta, "index component name is not initialized"));
            }
            // directory-built stacks carry links and resources per version
            let has_links =
                !meta.links.is_empty() || stack.versions.iter().any(|v| !v.links.is_empty());
            if !has_links {
                return Err(invalid(meta, "index component links are empty"));
            }
            let has_resources = !meta.resources.is_empty()
                || stack.versions.iter().any(|v| !v.resources.is_empty());
            if !has_resources {
                return Err(invalid(meta, "index component resources are empty"));
            }
        }
        CatalogEntry::Sample(_) => match &meta.git {
            None => return Err(invalid(meta, "index component git is empty")),
            Some(git) if git.remotes.len() > 1 => {
                return Err(invalid(meta, "index component has multiple remotes"));
            }
            Some(_) => {}
        },
    }

    let mut warnings = Vec::new();
    if meta.provider.is_empty() {
        warnings.push(Warning::MissingProvider {
            entry: meta.name.clone(),
        });
    }
    if meta.support_url.is_empty() {
        warnings.push(Warning::MissingSupportUrl {
            entry: meta.name.clone(),
        });
    }
    if meta.architectures.is_empty() {
        warnings.push(Warning::MissingArchitectures {
            entry: meta.name.clone(),
        });
    }
    Ok(warnings)
}

/// Validates an entry and logs its soft violations.
pub fn check_entry(entry: &CatalogEntry) -> Result<()> {
    for warning in validate_entry(entry)? {
        warn!("{}", warning);
    }
    Ok(())
}

/// Structural checks of a `stack.yaml`, run before any version is read.
pub fn validate_manifest(manifest: &StackManifest, stack: &str, stack_dir: &Path) -> Result<()> {
    let mut problems = Vec::new();

    if manifest.name.is_empty() {
        problems.push("name is not set in stack.yaml".to_string());
    }
    if manifest.display_name.is_empty() {
        problems.push("displayName is not set in stack.yaml".to_string());
    }
    if manifest.icon.is_empty() {
        problems.push("icon is not set in stack.yaml".to_string());
    }
    if manifest.versions.is_empty() {
        problems.push("versions list is not set in stack.yaml, or is empty".to_string());
    }

    let defaults = manifest.versions.iter().filter(|v| v.default).count();
    if defaults > 1 {
        problems.push("stack.yaml has multiple default versions".to_string());
    }

    for version in manifest.versions.iter().filter(|v| !v.is_remote()) {
        if let Err(e) = join_within(stack_dir, &version.version).and_then(dir_exists) {
            problems.push(format!(
                "cannot find resource folder for version {} defined in stack.yaml: {}",
                version.version, e
            ));
        }
    }

    if defaults == 0 {
        problems.push("stack.yaml does not contain a default version".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidManifest {
            stack: stack.to_string(),
            problems,
        })
    }
}
