//! Filesystem probes and copy helpers used by the index build and the
//! remote stack fetcher.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Whether anything (file or directory) exists at `path`.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    fs::symlink_metadata(path.as_ref()).is_ok()
}

/// Checks that `path` exists and is a directory, describing what is wrong
/// otherwise.
pub fn dir_exists<P: AsRef<Path>>(path: P) -> std::result::Result<(), String> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(format!("{} is not a directory", path.display())),
        Err(e) => Err(format!("path: {} does not exist: {}", path.display(), e)),
    }
}

/// Joins a relative path taken from a registry file onto `base`.
///
/// Absolute paths, drive prefixes and `..` components are refused, so the
/// result always lies under `base`.
pub fn join_within(base: &Path, relative: &str) -> std::result::Result<PathBuf, String> {
    let mut joined = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                return Err(format!(
                    "{} is not a relative path inside {}",
                    relative,
                    base.display()
                ));
            }
        }
    }
    Ok(joined)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let read = fs::read_dir(dir).map_err(|source| Error::ReadFile {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries = read.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Names of the non-directory entries of `dir`, sorted.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in read_dir_sorted(dir)? {
        if !entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Immediate subdirectories of `dir` as `(name, path)`, sorted by name.
/// Other entries are skipped.
pub fn list_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in read_dir_sorted(dir)? {
        // follow symlinks so linked stack folders are picked up
        if entry.path().is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    Ok(dirs)
}

/// Copies one file and applies the source's permission bits to the copy.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)?;
    let permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, permissions)?;
    Ok(())
}

/// Recursively copies `src` into `dst`, creating `dst` if needed.
/// Directories are created before their contents, with the source's
/// permission bits.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    fs::set_permissions(dst, fs::metadata(src)?.permissions())?;

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Extraction {
            message: format!("failed to walk {}: {}", src.display(), e),
        })?;
        let relative = entry.path().strip_prefix(src).map_err(|e| Error::Extraction {
            message: e.to_string(),
        })?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            let meta = entry.metadata().map_err(std::io::Error::from)?;
            fs::set_permissions(&target, meta.permissions())?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes every entry of `dir` whose name is not in `keep`.
pub fn clean_dir(dir: &Path, keep: &[&str]) -> Result<()> {
    for entry in read_dir_sorted(dir)? {
        let name = entry.file_name();
        if keep.iter().any(|k| name == *k) {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
