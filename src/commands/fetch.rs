//! # Fetch Command Implementation
//!
//! Materializes a remote stack version. The version must be declared in the
//! stack's `stack.yaml` with a `git` source; the index build leaves such
//! versions unpopulated and this command is how their sources reach disk.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use devfile_index::config::{STACKS_DIR, STACK_MANIFEST};
use devfile_index::fetch::{default_destination, download_remote_stack};
use devfile_index::git::DefaultGitOperations;
use devfile_index::schema::StackManifest;

/// Download a remote stack version declared in a stack.yaml
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Root of the registry (the directory containing `stacks/`).
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// Stack folder name under `stacks/`.
    #[arg(long, value_name = "NAME")]
    pub stack: String,

    /// Version identifier as declared in `stack.yaml`.
    #[arg(long, value_name = "VERSION")]
    pub version: String,

    /// Destination directory. Defaults to `./<stack>/<version>`.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

/// Execute the `fetch` command.
pub fn execute(args: FetchArgs) -> Result<()> {
    let manifest_path = args
        .registry
        .join(STACKS_DIR)
        .join(&args.stack)
        .join(STACK_MANIFEST);
    let manifest = StackManifest::from_file(&manifest_path)
        .with_context(|| format!("cannot load stack {}", args.stack))?;

    let version = manifest
        .versions
        .iter()
        .find(|v| v.version == args.version)
        .ok_or_else(|| {
            anyhow!(
                "version {} is not declared in {}",
                args.version,
                manifest_path.display()
            )
        })?;
    let git = version.git.as_ref().ok_or_else(|| {
        anyhow!(
            "version {} of {} is stored in the registry, not in a remote repository",
            args.version,
            args.stack
        )
    })?;

    let dest = args
        .dest
        .unwrap_or_else(|| default_destination(Path::new("."), &args.stack, &args.version));

    download_remote_stack(git, &dest, &DefaultGitOperations).with_context(|| {
        format!(
            "failed to fetch {} version {} into {}",
            args.stack,
            args.version,
            dest.display()
        )
    })?;

    println!(
        "Fetched {} version {} into {}",
        args.stack,
        args.version,
        dest.display()
    );
    Ok(())
}
