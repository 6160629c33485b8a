//! # Catalog Schema
//!
//! Data structures of the generated index and of the registry files it is
//! built from.
//!
//! ## Key Components
//!
//! - **`CatalogEntry`**: one element of the index. Stacks and samples share
//!   the common [`EntryMeta`] but differ in payload and validation rules, so
//!   the entry is an enum tagged by the `type` field in JSON.
//! - **`VersionEntry`**: one version of a stack.
//! - **`GitRef`**: a remote source a version or sample is fetched from.
//! - **`StackManifest`**: the contents of a `stack.yaml`.
//! - **`ExtraEntries`**: the contents of `extraDevfileEntries.yaml`.
//!
//! Field names follow the registry's JSON conventions (camelCase) and empty
//! fields are omitted on output. Omitted fields deserialize back to their
//! empty defaults, so serializing and re-parsing an index is lossless.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Appends every value of `items` to `set` that is not already present,
/// keeping first-appearance order.
pub fn union_into(set: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !set.contains(item) {
            set.push(item.clone());
        }
    }
}

/// A remote git source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    /// Named remotes (`name -> url`); samples declare their source this way.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remotes: BTreeMap<String, String>,
    /// Clone URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Name given to the remote in the clone.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remote_name: String,
    /// Branch, tag or commit hash. Empty means the default branch.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revision: String,
    /// Only this subdirectory of the clone is wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_dir: Option<String>,
}

impl GitRef {
    /// The URL to clone: `url` when set, otherwise the remote named by
    /// `remote_name`, otherwise the first declared remote.
    pub fn clone_url(&self) -> Option<&str> {
        if !self.url.is_empty() {
            return Some(self.url.as_str());
        }
        self.remotes
            .get(&self.remote_name)
            .or_else(|| self.remotes.values().next())
            .map(String::as_str)
    }

    /// The remote name to use in the clone, defaulting to `origin`.
    pub fn origin_name(&self) -> &str {
        if !self.remote_name.is_empty() {
            return &self.remote_name;
        }
        if self.url.is_empty() {
            if let Some(name) = self.remotes.keys().next() {
                return name;
            }
        }
        "origin"
    }
}

/// Metadata common to stacks and samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub support_url: String,
    /// Ordered set, first appearance wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Ordered set, first appearance wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub architectures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitRef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starter_projects: Vec<String>,
}

/// One version of a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
    /// Remote source. Remote versions are not read during the index build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub architectures: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starter_projects: Vec<String>,
}

impl VersionEntry {
    /// Whether the version is backed by a remote source instead of a folder.
    pub fn is_remote(&self) -> bool {
        self.git.is_some()
    }
}

/// A versioned project template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    #[serde(flatten)]
    pub meta: EntryMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<VersionEntry>,
}

impl StackEntry {
    /// Seeds an entry from the stack-level fields and versions of a manifest.
    pub fn from_manifest(manifest: StackManifest) -> Self {
        Self {
            meta: EntryMeta {
                name: manifest.name,
                display_name: manifest.display_name,
                description: manifest.description,
                icon: manifest.icon,
                ..EntryMeta::default()
            },
            versions: manifest.versions,
        }
    }

    /// The version flagged as default, if any.
    pub fn default_version(&self) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.default)
    }
}

/// A starter sample backed entirely by a remote source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleEntry {
    #[serde(flatten)]
    pub meta: EntryMeta,
}

/// Kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Stack,
    Sample,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Stack => write!(f, "stack"),
            EntryKind::Sample => write!(f, "sample"),
        }
    }
}

/// One element of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogEntry {
    Stack(StackEntry),
    Sample(SampleEntry),
}

impl CatalogEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            CatalogEntry::Stack(_) => EntryKind::Stack,
            CatalogEntry::Sample(_) => EntryKind::Sample,
        }
    }

    pub fn meta(&self) -> &EntryMeta {
        match self {
            CatalogEntry::Stack(stack) => &stack.meta,
            CatalogEntry::Sample(sample) => &sample.meta,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }
}

/// Contents of a per-stack `stack.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Declared versions; only `version`, `default` and `git` are meaningful.
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

impl StackManifest {
    /// Reads and parses a `stack.yaml`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Contents of `extraDevfileEntries.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraEntries {
    #[serde(default)]
    pub samples: Vec<SampleEntry>,
    #[serde(default)]
    pub stacks: Vec<StackEntry>,
}

impl ExtraEntries {
    /// Reads and parses an extra entries manifest.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty manifest carries no entries.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stack() -> CatalogEntry {
        CatalogEntry::Stack(StackEntry {
            meta: EntryMeta {
                name: "nodejs".to_string(),
                display_name: "Node.js Runtime".to_string(),
                language: "javascript".to_string(),
                tags: vec!["Node.js".to_string(), "Express".to_string()],
                architectures: vec!["amd64".to_string()],
                ..EntryMeta::default()
            },
            versions: vec![VersionEntry {
                version: "1.0.0".to_string(),
                default: true,
                links: BTreeMap::from([(
                    "self".to_string(),
                    "devfile-catalog/nodejs:1.0.0".to_string(),
                )]),
                resources: vec!["devfile.yaml".to_string()],
                ..VersionEntry::default()
            }],
        })
    }

    #[test]
    fn test_union_into_preserves_order_and_dedupes() {
        let mut set = vec!["a".to_string(), "b".to_string()];
        union_into(&mut set, &["b".to_string(), "c".to_string(), "a".to_string()]);
        assert_eq!(set, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_stack_serializes_with_type_tag() {
        let json = serde_json::to_value(sample_stack()).unwrap();
        assert_eq!(json["type"], "stack");
        assert_eq!(json["name"], "nodejs");
        assert_eq!(json["displayName"], "Node.js Runtime");
        assert_eq!(json["versions"][0]["default"], true);
        assert_eq!(
            json["versions"][0]["links"]["self"],
            "devfile-catalog/nodejs:1.0.0"
        );
        // empty fields are omitted
        assert!(json.get("provider").is_none());
        assert!(json.get("git").is_none());
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let sample = CatalogEntry::Sample(SampleEntry {
            meta: EntryMeta {
                name: "nodejs-basic".to_string(),
                git: Some(GitRef {
                    remotes: BTreeMap::from([(
                        "origin".to_string(),
                        "https://github.com/devfile-samples/nodejs-basic.git".to_string(),
                    )]),
                    sub_dir: Some("app".to_string()),
                    ..GitRef::default()
                }),
                ..EntryMeta::default()
            },
        });
        let catalog = vec![sample_stack(), sample];
        let json = serde_json::to_string_pretty(&catalog).unwrap();
        let parsed: Vec<CatalogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_entry_kind_and_name() {
        let entry = sample_stack();
        assert_eq!(entry.kind(), EntryKind::Stack);
        assert_eq!(entry.kind().to_string(), "stack");
        assert_eq!(entry.name(), "nodejs");
    }

    #[test]
    fn test_git_ref_clone_url_prefers_url() {
        let git = GitRef {
            url: "https://example.com/a.git".to_string(),
            remotes: BTreeMap::from([("up".to_string(), "https://example.com/b.git".to_string())]),
            ..GitRef::default()
        };
        assert_eq!(git.clone_url(), Some("https://example.com/a.git"));
        assert_eq!(git.origin_name(), "origin");
    }

    #[test]
    fn test_git_ref_clone_url_from_remotes() {
        let git = GitRef {
            remotes: BTreeMap::from([("up".to_string(), "https://example.com/b.git".to_string())]),
            ..GitRef::default()
        };
        assert_eq!(git.clone_url(), Some("https://example.com/b.git"));
        assert_eq!(git.origin_name(), "up");
        assert_eq!(GitRef::default().clone_url(), None);
    }

    #[test]
    fn test_stack_manifest_parse() {
        let yaml = r#"
name: nodejs
displayName: Node.js Runtime
icon: https://nodejs.org/static/images/logos/nodejs-new-pantone-black.svg
versions:
  - version: 1.0.0
    default: true
  - version: 2.0.0
    git:
      url: https://github.com/devfile/registry.git
      revision: main
      subDir: stacks/nodejs/2.0.0
"#;
        let manifest: StackManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.versions.len(), 2);
        assert!(manifest.versions[0].default);
        assert!(!manifest.versions[0].is_remote());
        let git = manifest.versions[1].git.as_ref().unwrap();
        assert_eq!(git.sub_dir.as_deref(), Some("stacks/nodejs/2.0.0"));

        let stack = StackEntry::from_manifest(manifest);
        assert_eq!(stack.meta.display_name, "Node.js Runtime");
        assert_eq!(stack.default_version().unwrap().version, "1.0.0");
    }

    #[test]
    fn test_extra_entries_parse() {
        let yaml = r#"
samples:
  - name: nodejs-basic
    displayName: Basic Node.js
    git:
      remotes:
        origin: https://github.com/devfile-samples/nodejs-basic.git
stacks:
  - name: java-quarkus
    links:
      self: devfile-catalog/java-quarkus:latest
    resources:
      - devfile.yaml
"#;
        let extra: ExtraEntries = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(extra.samples.len(), 1);
        assert_eq!(extra.samples[0].meta.display_name, "Basic Node.js");
        assert_eq!(extra.stacks[0].meta.resources, vec!["devfile.yaml"]);
    }
}
