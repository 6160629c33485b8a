//! Supplemental entries from `extraDevfileEntries.yaml`.
//!
//! The manifest lists samples and stacks that have no folder under
//! `stacks/`. When the sample sources have been cached under `samples/`,
//! each sample's devfile is validated as well.

use std::path::Path;

use log::info;

use crate::config::{DEVFILE, EXTRA_ENTRIES, SAMPLES_DIR};
use crate::error::{Error, Result};
use crate::filesystem::file_exists;
use crate::index::validation::check_entry;
use crate::index::BuildContext;
use crate::schema::{CatalogEntry, ExtraEntries, SampleEntry};

/// Loads the extra entries of a registry: samples first, then stacks.
/// A missing manifest contributes nothing.
pub fn load_extra_entries(registry: &Path, ctx: &BuildContext<'_>) -> Result<Vec<CatalogEntry>> {
    let manifest_path = registry.join(EXTRA_ENTRIES);
    if !file_exists(&manifest_path) {
        return Ok(Vec::new());
    }

    let extra = ExtraEntries::from_file(&manifest_path)?;
    info!(
        "Loading {} samples and {} stacks from {}",
        extra.samples.len(),
        extra.stacks.len(),
        EXTRA_ENTRIES
    );

    let samples_dir = registry.join(SAMPLES_DIR);
    let validate_samples = file_exists(&samples_dir);

    let mut entries = Vec::with_capacity(extra.samples.len() + extra.stacks.len());
    let samples = extra.samples.into_iter().map(CatalogEntry::Sample);
    let stacks = extra.stacks.into_iter().map(CatalogEntry::Stack);

    for entry in samples.chain(stacks) {
        if !ctx.config.force {
            if let CatalogEntry::Sample(sample) = &entry {
                if validate_samples {
                    validate_cached_sample(ctx, &samples_dir, sample)?;
                }
            }
            check_entry(&entry)?;
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Checks the cached devfile of a sample under `samples/<name>/`.
fn validate_cached_sample(
    ctx: &BuildContext<'_>,
    samples_dir: &Path,
    sample: &SampleEntry,
) -> Result<()> {
    let devfile_path = samples_dir.join(&sample.meta.name).join(DEVFILE);
    if !file_exists(&devfile_path) {
        return Err(Error::InvalidEntry {
            name: sample.meta.name.clone(),
            message: format!(
                "devfile sample does not have a {}: {} not found",
                DEVFILE,
                devfile_path.display()
            ),
        });
    }
    ctx.validator
        .parse_and_validate(&devfile_path)
        .map_err(|e| Error::InvalidEntry {
            name: sample.meta.name.clone(),
            message: format!("sample devfile is not valid: {}", e),
        })?;
    Ok(())
}
