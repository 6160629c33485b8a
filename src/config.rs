//! # Build Configuration
//!
//! File-name conventions of a devfile registry and the knobs that control
//! an index build. The CLI maps its flags (and their environment variable
//! fallbacks) onto [`IndexConfig`]; library callers construct it directly.

use std::path::{Path, PathBuf};

/// Directory under the registry root holding one folder per stack.
pub const STACKS_DIR: &str = "stacks";
/// Optional directory of cached sample sources.
pub const SAMPLES_DIR: &str = "samples";
/// Per-stack manifest declaring the stack's versions.
pub const STACK_MANIFEST: &str = "stack.yaml";
/// Primary devfile name.
pub const DEVFILE: &str = "devfile.yaml";
/// Alternate (hidden) devfile name.
pub const DEVFILE_HIDDEN: &str = ".devfile.yaml";
/// Optional flat manifest of samples and stacks without a stack folder.
pub const EXTRA_ENTRIES: &str = "extraDevfileEntries.yaml";
/// Namespace used to build the `self` link of each version.
pub const DEFAULT_CATALOG_NAMESPACE: &str = "devfile-catalog";
/// Version identifier used when neither the layout nor the devfile names one.
pub const LATEST_VERSION: &str = "latest";
/// File name of the generated index when no output path is given.
pub const DEFAULT_INDEX_FILE: &str = "index.json";

/// Settings for a single index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Skip every validation step and build best-effort.
    pub force: bool,
    /// Prefix of the `self` link: `<namespace>/<stack>:<version>`.
    pub catalog_namespace: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            force: false,
            catalog_namespace: DEFAULT_CATALOG_NAMESPACE.to_string(),
        }
    }
}

impl IndexConfig {
    /// Returns a config with `force` set as given and defaults otherwise.
    pub fn with_force(force: bool) -> Self {
        Self {
            force,
            ..Self::default()
        }
    }

    /// Builds the `self` link for one version of a stack.
    pub fn self_link(&self, stack_name: &str, version: &str) -> String {
        format!("{}/{}:{}", self.catalog_namespace, stack_name, version)
    }
}

/// Default output location for `generate`, relative to the registry root.
pub fn default_index_path(registry: &Path) -> PathBuf {
    registry.join(DEFAULT_INDEX_FILE)
}
