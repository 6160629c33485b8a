//! # Devfile Boundary
//!
//! The index only needs a small slice of a devfile: its `schemaVersion`, the
//! `metadata` block and the names of its starter projects. Full devfile
//! schema validation belongs to an external validator, modelled here as the
//! [`DevfileValidator`] trait so callers (and tests) can plug in their own.
//!
//! [`SchemaVersionValidator`] is the built-in validator: it accepts any YAML
//! document with a semver `schemaVersion` and a `metadata` mapping.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DEVFILE, DEVFILE_HIDDEN};
use crate::error::{Error, Result};
use crate::filesystem::file_exists;

/// The `metadata` block of a devfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevfileMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub support_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub architectures: Vec<String>,
}

impl DevfileMetadata {
    /// Required fields that are empty, by devfile field name.
    pub fn missing_required(&self) -> Vec<String> {
        [
            ("name", &self.name),
            ("displayName", &self.display_name),
            ("language", &self.language),
            ("projectType", &self.project_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterProject {
    #[serde(default)]
    pub name: String,
}

/// The parts of a devfile the index reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devfile {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub metadata: DevfileMetadata,
    #[serde(default)]
    pub starter_projects: Vec<StarterProject>,
}

impl Devfile {
    /// Reads and deserializes a devfile without validating it.
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

    pub fn starter_project_names(&self) -> Vec<String> {
        self.starter_projects.iter().map(|p| p.name.clone()).collect()
    }
}

/// External devfile parser/validator.
pub trait DevfileValidator {
    /// Parses and validates the devfile at `path`, returning its metadata.
    fn parse_and_validate(&self, path: &Path) -> Result<DevfileMetadata>;
}

/// Validator that checks the document shape and `schemaVersion` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaVersionValidator;

impl DevfileValidator for SchemaVersionValidator {
    fn parse_and_validate(&self, path: &Path) -> Result<DevfileMetadata> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: String| Error::InvalidDevfile {
            path: path.to_path_buf(),
            message,
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let schema_version = value
            .get("schemaVersion")
            .and_then(serde_yaml::Value::as_str)
            .ok_or_else(|| invalid("schemaVersion is not set".to_string()))?;
        semver::Version::parse(schema_version)
            .map_err(|e| invalid(format!("schemaVersion {}: {}", schema_version, e)))?;

        match value.get("metadata") {
            None => Ok(DevfileMetadata::default()),
            Some(metadata) if metadata.is_mapping() => {
                serde_yaml::from_value(metadata.clone()).map_err(|e| invalid(e.to_string()))
            }
            Some(_) => Err(invalid("metadata must be a mapping".to_string())),
        }
    }
}

/// Finds the devfile of a directory, accepting `devfile.yaml` or
/// `.devfile.yaml` but not both.
pub fn locate_devfile(dir: &Path) -> Result<PathBuf> {
    let devfile = dir.join(DEVFILE);
    let hidden = dir.join(DEVFILE_HIDDEN);
    match (file_exists(&devfile), file_exists(&hidden)) {
        (true, true) => Err(Error::DevfileConflict {
            first: devfile,
            second: hidden,
        }),
        (false, true) => Ok(hidden),
        (true, false) => Ok(devfile),
        (false, false) => Err(Error::MissingDevfile { path: devfile }),
    }
}

/// Runs the validator and the required-metadata check on one devfile.
pub fn validate_devfile(validator: &dyn DevfileValidator, path: &Path, dir: &Path) -> Result<()> {
    let metadata = validator.parse_and_validate(path)?;
    let missing = metadata.missing_required();
    if !missing.is_empty() {
        return Err(Error::MissingMetadata {
            path: dir.to_path_buf(),
            fields: missing,
        });
    }
    Ok(())
}
