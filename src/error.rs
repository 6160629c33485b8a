//! # Error Handling
//!
//! This module defines the centralized error type for index generation and
//! remote stack fetching. It uses `thiserror` to build a single `Error` enum
//! whose variants carry the path, stack or URL involved so that the binary
//! can report the failing entry together with the underlying cause.
//!
//! The variants follow the failure classes of the index build:
//!
//! - I/O and parse failures (`Io`, `ReadFile`, `Parse`, `Json`).
//! - Structural validation failures (`DevfileConflict`, `MissingDevfile`,
//!   `InvalidDevfile`, `MissingMetadata`, `InvalidManifest`, `InvalidEntry`).
//!   These are only produced when the build is not forced.
//! - Remote fetch failures (`GitClone`, `NoMatchingRef`, `Extraction`,
//!   `Signal`).
//!
//! Every variant is fatal to the build. Soft completeness problems are not
//! errors at all; see [`crate::index::validation::Warning`].

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for devfile-index operations
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A structured file (stack.yaml, devfile, extra entries) could not be
    /// deserialized.
    #[error("failed to unmarshal {} data: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Both `devfile.yaml` and `.devfile.yaml` exist in one directory.
    #[error("both {} and {} exist", first.display(), second.display())]
    DevfileConflict { first: PathBuf, second: PathBuf },

    /// Neither devfile name exists in a version directory.
    #[error("no devfile found at {}", path.display())]
    MissingDevfile { path: PathBuf },

    /// The devfile validator rejected a devfile.
    #[error("{} devfile is not valid: {message}", path.display())]
    InvalidDevfile { path: PathBuf, message: String },

    /// Required devfile metadata fields are absent.
    #[error("{} devfile is not valid: {}", path.display(), format_missing(fields))]
    MissingMetadata { path: PathBuf, fields: Vec<String> },

    /// The stack.yaml manifest of a stack failed its structural checks.
    #[error("{stack} stack.yaml is not valid: {}", problems.join("; "))]
    InvalidManifest { stack: String, problems: Vec<String> },

    /// A finished catalog entry failed a hard validation rule.
    #[error("{name} index component is not valid: {message}")]
    InvalidEntry { name: String, message: String },

    /// An error occurred while cloning a Git repository.
    ///
    /// Includes the repository URL, ref (branch/tag), error message, and an
    /// optional hint for resolution.
    #[error("Git clone error for {url}@{r#ref}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// The remote has no branch (or tag) with the requested name.
    #[error("couldn't find remote ref {r#ref} in {url}")]
    NoMatchingRef { url: String, r#ref: String },

    /// Copying a subdirectory out of a staged clone failed.
    #[error("subdirectory extraction failed: {message}")]
    Extraction { message: String },

    /// Installing or removing the interrupt listener failed.
    #[error("signal handling error: {message}")]
    Signal { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

fn format_missing(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| format!("metadata.{} is not set", f))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
