//! # Index Generation
//!
//! Builds the catalog of a devfile registry and writes it as JSON.
//!
//! ## Execution Flow
//!
//! 1.  **Walk** (`walker`): one stack entry per folder of `stacks/`, legacy
//!     or versioned.
//! 2.  **Merge** (`merge`): each local version's devfile is folded into its
//!     stack entry.
//! 3.  **Validate** (`validation`): manifests and finished entries are
//!     checked unless the build is forced.
//! 4.  **Extra entries** (`extra`): samples and stacks from
//!     `extraDevfileEntries.yaml` are appended.
//!
//! Entries are processed one at a time and the first error aborts the whole
//! build; no partial index is ever produced.

pub mod extra;
pub mod merge;
pub mod validation;
pub mod walker;

use std::fs;
use std::path::Path;

use log::info;

use crate::config::IndexConfig;
use crate::devfile::DevfileValidator;
use crate::error::{Error, Result};
use crate::schema::CatalogEntry;

/// Everything a build step needs besides the paths it works on.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub config: &'a IndexConfig,
    pub validator: &'a dyn DevfileValidator,
}

/// Builds the full catalog of the registry rooted at `registry`.
pub fn generate_index(
    registry: &Path,
    config: &IndexConfig,
    validator: &dyn DevfileValidator,
) -> Result<Vec<CatalogEntry>> {
    let ctx = BuildContext { config, validator };

    let mut index = walker::walk_stacks(registry, &ctx)?;
    index.extend(extra::load_extra_entries(registry, &ctx)?);

    info!(
        "Built index of {} entries from {}",
        index.len(),
        registry.display()
    );
    Ok(index)
}

/// Writes the catalog to `path` as two-space indented JSON.
pub fn write_index(index: &[CatalogEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(index)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a catalog previously written by [`write_index`].
pub fn read_index(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
