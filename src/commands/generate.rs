//! # Generate Command Implementation
//!
//! Builds the index of a registry directory and writes it as JSON.
//!
//! The build is all-or-nothing: when any entry fails, the error names the
//! failing stack or file and no index file is written.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use devfile_index::config::{default_index_path, IndexConfig, DEFAULT_CATALOG_NAMESPACE};
use devfile_index::devfile::SchemaVersionValidator;
use devfile_index::index::{generate_index, write_index};

/// Generate index.json from a registry directory
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Root of the registry (the directory containing `stacks/`).
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// Where to write the index. Defaults to `<REGISTRY>/index.json`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip all validation and build the index best-effort.
    #[arg(short, long, env = "DEVFILE_INDEX_FORCE")]
    pub force: bool,

    /// Namespace used in each version's `self` link.
    #[arg(
        long,
        value_name = "NAMESPACE",
        env = "DEVFILE_INDEX_NAMESPACE",
        default_value = DEFAULT_CATALOG_NAMESPACE
    )]
    pub namespace: String,
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = IndexConfig {
        force: args.force,
        catalog_namespace: args.namespace,
    };
    let output = args
        .output
        .unwrap_or_else(|| default_index_path(&args.registry));

    let index = generate_index(&args.registry, &config, &SchemaVersionValidator)
        .with_context(|| format!("failed to generate index for {}", args.registry.display()))?;

    write_index(&index, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} index entries to {}",
        index.len(),
        output.display()
    );
    Ok(())
}
