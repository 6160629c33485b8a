//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a registry fixture, devfile snippets and helper
//! functions to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let registry = RegistryFixture::new()
//!     .with_legacy_stack("go", &devfiles::complete("go", "1.0.0", "Go"));
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::devfiles;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::RegistryFixture;
}

/// Devfile and manifest snippets for testing.
#[allow(dead_code)]
pub mod devfiles {
    /// A devfile with every field the index reads.
    pub fn complete(name: &str, version: &str, language: &str) -> String {
        format!(
            r#"schemaVersion: 2.2.0
metadata:
  name: {name}
  version: {version}
  displayName: {name} runtime
  description: Stack with {language}
  icon: https://example.com/{name}.svg
  language: {language}
  projectType: {name}
  provider: Red Hat
  supportUrl: https://github.com/devfile/registry/issues
  tags: [{language}]
  architectures: [amd64]
starterProjects:
  - name: {name}-starter
"#
        )
    }

    /// A devfile missing provider, supportUrl and architectures.
    pub fn incomplete(name: &str, version: &str, language: &str) -> String {
        format!(
            r#"schemaVersion: 2.2.0
metadata:
  name: {name}
  version: {version}
  displayName: {name} runtime
  language: {language}
  projectType: {name}
"#
        )
    }

    /// A `stack.yaml` declaring local versions; the first one is default.
    pub fn stack_yaml(name: &str, versions: &[&str]) -> String {
        let mut yaml = format!(
            "name: {name}\ndisplayName: {name} runtime\nicon: https://example.com/{name}.svg\nversions:\n"
        );
        for (i, version) in versions.iter().enumerate() {
            yaml.push_str(&format!("  - version: {version}\n"));
            if i == 0 {
                yaml.push_str("    default: true\n");
            }
        }
        yaml
    }
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary registry directory with a `stacks/` folder.
///
/// # Example
///
/// ```rust,ignore
/// let registry = RegistryFixture::new()
///     .with_file("stacks/nodejs/stack.yaml", &devfiles::stack_yaml("nodejs", &["1.0.0"]))
///     .with_file("stacks/nodejs/1.0.0/devfile.yaml", &devfiles::complete("nodejs", "1.0.0", "javascript"));
/// ```
pub struct RegistryFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl RegistryFixture {
    /// Create a registry with an empty `stacks/` directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("stacks")
            .create_dir_all()
            .expect("Failed to create stacks directory");
        Self { temp_dir }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a stack without `stack.yaml`.
    pub fn with_legacy_stack(self, name: &str, devfile: &str) -> Self {
        self.with_file(&format!("stacks/{name}/devfile.yaml"), devfile)
    }

    /// Add a versioned stack whose versions all use `devfile` rendered for
    /// that version by `render`.
    pub fn with_versioned_stack(
        self,
        name: &str,
        versions: &[&str],
        render: impl Fn(&str) -> String,
    ) -> Self {
        let mut fixture =
            self.with_file(&format!("stacks/{name}/stack.yaml"), &devfiles::stack_yaml(name, versions));
        for version in versions {
            fixture = fixture.with_file(
                &format!("stacks/{name}/{version}/devfile.yaml"),
                &render(version),
            );
        }
        fixture
    }

    /// Get the registry root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the registry.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command for the devfile-index binary.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("devfile-index");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}
