//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Devfile Index - Build the index of a devfile registry
#[derive(Parser, Debug)]
#[command(name = "devfile-index")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate index.json from a registry directory
    Generate(commands::generate::GenerateArgs),

    /// Download a remote stack version declared in a stack.yaml
    Fetch(commands::fetch::FetchArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .init();

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args),
            Commands::Fetch(args) => commands::fetch::execute(args),
        }
    }
}
