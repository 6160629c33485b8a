//! # Devfile Index Library
//!
//! This library builds the index of a devfile registry: a JSON catalog of
//! the registry's stacks (versioned project templates) and samples. It is
//! used by the `devfile-index` command-line tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use devfile_index::config::IndexConfig;
//! use devfile_index::devfile::SchemaVersionValidator;
//! use devfile_index::index::{generate_index, write_index};
//! use std::path::Path;
//!
//! let registry = Path::new("registry");
//! let index = generate_index(registry, &IndexConfig::default(), &SchemaVersionValidator)?;
//! write_index(&index, &registry.join("index.json"))?;
//! # Ok::<(), devfile_index::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Schema (`schema`)**: the catalog entry types and the registry files
//!   (`stack.yaml`, `extraDevfileEntries.yaml`) they are read from.
//! - **Devfiles (`devfile`)**: the slice of a devfile the index reads, and
//!   the validator seam for full devfile validation.
//! - **Index (`index`)**: walking `stacks/`, merging versions into entries,
//!   loading extra entries and applying the validation policy.
//! - **Fetching (`fetch`, `git`)**: shallow-cloning remote stack versions,
//!   optionally extracting only a subdirectory.
//!
//! ## Registry Layout
//!
//! ```text
//! registry/
//! ├── stacks/
//! │   ├── go/                  legacy stack: devfile at the root
//! │   │   └── devfile.yaml
//! │   └── nodejs/              versioned stack
//! │       ├── stack.yaml
//! │       ├── 1.0.0/devfile.yaml
//! │       └── 2.0.0/.devfile.yaml
//! ├── samples/                 optional cache of sample sources
//! └── extraDevfileEntries.yaml optional samples and stacks
//! ```

pub mod config;
pub mod devfile;
pub mod error;
pub mod fetch;
pub mod filesystem;
pub mod git;
pub mod index;
pub mod schema;

#[cfg(test)]
mod merge_proptest;
