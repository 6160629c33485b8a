//! # Devfile Index CLI
//!
//! This is the binary entry point for the `devfile-index` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Reporting errors (with the failing entry or path) and exiting non-zero.
//!
//! The index building and fetching logic lives in the `devfile_index`
//! library crate; the binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
