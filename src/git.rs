//! Shallow cloning through the system `git` command.
//!
//! Clones are depth 1 and single-branch. The [`GitOperations`] trait is the
//! seam the fetcher talks to, so the branch-then-tag resolution can be
//! exercised without network access.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

/// What to check out from the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The remote's default branch.
    DefaultBranch,
    Branch(String),
    Tag(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::DefaultBranch => write!(f, "HEAD"),
            Reference::Branch(name) => write!(f, "refs/heads/{}", name),
            Reference::Tag(name) => write!(f, "refs/tags/{}", name),
        }
    }
}

/// A single shallow clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub url: String,
    /// Name of the remote inside the clone.
    pub origin: String,
    pub reference: Reference,
    pub target: PathBuf,
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Shallow-clones `request.reference` of `request.url` into
    /// `request.target`. A reference the remote does not have must be
    /// reported as [`Error::NoMatchingRef`].
    fn clone_shallow(&self, request: &CloneRequest) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
///
/// Using the command line picks up SSH keys, credential helpers and any
/// authentication configured in `~/.gitconfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_shallow(&self, request: &CloneRequest) -> Result<()> {
        clone_shallow(request)
    }
}

/// Whether `revision` is a full commit hash.
pub fn is_commit_hash(revision: &str) -> bool {
    revision.len() == 40 && revision.chars().all(|c| c.is_ascii_hexdigit())
}

/// Extracts the missing ref name from git's "not found in upstream" message.
fn missing_remote_ref(stderr: &str) -> Result<Option<String>> {
    let regex = Regex::new(r"[Rr]emote branch (\S+) not found in upstream").map_err(Error::Regex)?;
    Ok(regex.captures(stderr).map(|c| c[1].to_string()))
}

/// Runs `git clone --depth=1 --single-branch [--origin <name>] [--branch <ref>]`.
pub fn clone_shallow(request: &CloneRequest) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth=1", "--single-branch"]);
    if !request.origin.is_empty() {
        cmd.args(["--origin", request.origin.as_str()]);
    }
    if let Reference::Branch(name) | Reference::Tag(name) = &request.reference {
        cmd.args(["--branch", name.as_str()]);
    }
    cmd.arg(&request.url).arg(&request.target);

    debug!(
        "cloning {} ({}) into {}",
        request.url,
        request.reference,
        request.target.display()
    );
    let output = cmd.output().map_err(|e| Error::GitClone {
        url: request.url.clone(),
        r#ref: request.reference.to_string(),
        message: e.to_string(),
        hint: Some("Make sure git is installed and on PATH".to_string()),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if let Some(r#ref) = missing_remote_ref(&stderr)? {
        return Err(Error::NoMatchingRef {
            url: request.url.clone(),
            r#ref,
        });
    }

    // Provide helpful error message for common auth failures
    let hint = if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some("Authentication failed. Make sure you have access to the repository (SSH key, credential helper or access token).".to_string())
    } else {
        None
    };

    Err(Error::GitClone {
        url: request.url.clone(),
        r#ref: request.reference.to_string(),
        message: stderr.trim().to_string(),
        hint,
    })
}

/// Path of the git metadata directory inside a clone.
pub fn git_dir(clone: &Path) -> PathBuf {
    clone.join(".git")
}
