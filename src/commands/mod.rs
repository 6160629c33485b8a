//! # CLI Command Implementations
//!
//! Each subcommand of `devfile-index` lives in its own module with:
//! - an `Args` struct derived with `clap`, and
//! - an `execute` function that calls into the `devfile_index` library.

pub mod fetch;
pub mod generate;
