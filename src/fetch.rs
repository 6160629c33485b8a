//! # Remote Stack Fetcher
//!
//! Materializes a remote stack version ([`GitRef`]) onto local disk.
//!
//! ## Reference resolution
//!
//! A commit hash in `revision` is not supported and is ignored, as is an
//! empty revision: the remote's default branch is cloned. Any other revision
//! is first tried as a branch and, if the remote has no such branch, once
//! more as a tag.
//!
//! ## Subdirectory extraction
//!
//! When only `subDir` is wanted the clone goes to a temporary staging
//! directory and the subdirectory is copied into the destination. The copy
//! runs inside an [`InterruptGuard`]: if the process receives SIGHUP, SIGINT,
//! SIGTERM or SIGQUIT before the copy completes, [`cleanup_interrupted`]
//! empties the destination (keeping a pre-existing `devfile.yaml`), removes
//! the staging directory and exits with status 1. The destination therefore
//! never ends up holding a truncated copy.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use log::{debug, error, info, warn};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

use crate::config::DEVFILE;
use crate::error::{Error, Result};
use crate::filesystem::{clean_dir, copy_dir, copy_file, join_within};
use crate::git::{git_dir, is_commit_hash, CloneRequest, GitOperations, Reference};
use crate::schema::GitRef;

/// Signals that abort an extraction.
pub const TERMINATION_SIGNALS: [i32; 4] = [SIGHUP, SIGINT, SIGTERM, SIGQUIT];

/// Files of the destination that survive an interrupted extraction.
pub const PRESERVED_ON_INTERRUPT: [&str; 1] = [DEVFILE];

/// Maps a revision onto the first reference to try.
pub fn resolve_reference(revision: &str) -> Reference {
    if revision.is_empty() {
        return Reference::DefaultBranch;
    }
    if is_commit_hash(revision) {
        warn!(
            "Specifying commit in 'revision' is not yet supported, cloning the default branch instead of {}",
            revision
        );
        return Reference::DefaultBranch;
    }
    Reference::Branch(revision.to_string())
}

/// Removes the `.git` directory of a clone. Failures are only logged.
fn strip_git_metadata(clone: &Path) {
    let dir = git_dir(clone);
    if !dir.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(&dir) {
        warn!(
            "Unable to delete {} from cloned devfile repository: {}",
            dir.display(),
            e
        );
    }
}

/// Clones `git` into `target`, retrying a missing branch as a tag.
pub fn clone_with_fallback(git: &GitRef, target: &Path, ops: &dyn GitOperations) -> Result<()> {
    let url = git.clone_url().ok_or_else(|| Error::GitClone {
        url: String::new(),
        r#ref: git.revision.clone(),
        message: "no url or remote declared".to_string(),
        hint: Some("Set 'url' or 'remotes' on the git source".to_string()),
    })?;

    let mut request = CloneRequest {
        url: url.to_string(),
        origin: git.origin_name().to_string(),
        reference: resolve_reference(&git.revision),
        target: target.to_path_buf(),
    };

    let first = ops.clone_shallow(&request);
    let no_matching_ref = matches!(first, Err(Error::NoMatchingRef { .. }));
    let tag = match &request.reference {
        Reference::Branch(name) if no_matching_ref => name.clone(),
        _ => return first,
    };

    debug!("no branch {} in {}, retrying as a tag", tag, url);
    // remove any partial clone left by the first attempt
    let partial = git_dir(target);
    if partial.exists() {
        if let Err(e) = fs::remove_dir_all(&partial) {
            warn!(
                "Unable to delete {} before retrying as a tag: {}",
                partial.display(),
                e
            );
        }
    }
    request.reference = Reference::Tag(tag);
    ops.clone_shallow(&request)
}

/// Downloads a remote stack version into `dest`.
pub fn download_remote_stack(git: &GitRef, dest: &Path, ops: &dyn GitOperations) -> Result<()> {
    let Some(sub_dir) = git.sub_dir.as_deref().filter(|s| !s.is_empty()) else {
        clone_with_fallback(git, dest, ops)?;
        strip_git_metadata(dest);
        return Ok(());
    };

    let staging = tempfile::Builder::new()
        .prefix("devfile-index-")
        .tempdir()?;
    clone_with_fallback(git, staging.path(), ops)?;
    strip_git_metadata(staging.path());

    fs::create_dir_all(dest)?;
    {
        let dest_path = dest.to_path_buf();
        let staging_path = staging.path().to_path_buf();
        let _guard = InterruptGuard::install(move || {
            if let Err(e) = cleanup_interrupted(&dest_path, &staging_path) {
                error!("cleanup after interrupted extraction failed: {}", e);
            }
        })?;
        copy_subdir(staging.path(), sub_dir, dest)?;
    }

    staging.close()?;
    info!("Extracted {} into {}", sub_dir, dest.display());
    Ok(())
}

/// Copies every entry of `<staging>/<sub_dir>` into `dest`.
pub fn copy_subdir(staging: &Path, sub_dir: &str, dest: &Path) -> Result<()> {
    let source =
        join_within(staging, sub_dir).map_err(|message| Error::Extraction { message })?;
    let entries = fs::read_dir(&source).map_err(|e| Error::Extraction {
        message: format!("cannot open {}: {}", source.display(), e),
    })?;

    for entry in entries {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            copy_file(&entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Undoes a partial extraction: empties `dest` except for the preserved
/// files and removes `staging`. Safe to run more than once.
pub fn cleanup_interrupted(dest: &Path, staging: &Path) -> Result<()> {
    let cleaned = if dest.exists() {
        clean_dir(dest, &PRESERVED_ON_INTERRUPT)
    } else {
        Ok(())
    };
    if staging.exists() {
        fs::remove_dir_all(staging)?;
    }
    cleaned
}

/// Cancellation scope around an extraction.
///
/// While the guard is alive, a listener thread waits for one of
/// [`TERMINATION_SIGNALS`]; on delivery it runs the cleanup callback and
/// exits the process with status 1. Dropping the guard stops the listener.
pub struct InterruptGuard {
    handle: Handle,
    listener: Option<JoinHandle<()>>,
}

impl InterruptGuard {
    pub fn install<F>(on_signal: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut signals = Signals::new(TERMINATION_SIGNALS).map_err(|e| Error::Signal {
            message: e.to_string(),
        })?;
        let handle = signals.handle();

        let listener = std::thread::Builder::new()
            .name("extract-interrupt".to_string())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    warn!("received signal {}, cleaning up extraction", signal);
                    on_signal();
                    std::process::exit(1);
                }
            })?;

        Ok(Self {
            handle,
            listener: Some(listener),
        })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(listener) = self.listener.take() {
            if listener.join().is_err() {
                warn!("interrupt listener thread panicked");
            }
        }
    }
}

/// Where a fetched version should land by default:
/// `<base>/<stack>/<version>`.
pub fn default_destination(base: &Path, stack: &str, version: &str) -> PathBuf {
    base.join(stack).join(version)
}
