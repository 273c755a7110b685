//! Working-directory management: reset before a run, fixture placement.
//!
//! The harness owns its root directory exclusively. [`reset_dir`] clears it
//! in post-order and stops at the first entry it cannot remove;
//! [`copy_fixture`] drops a previously generated database file into place.

use std::fs::{self, File, FileTimes};
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::CoreError;

/// Result of a successful [`reset_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Whether the root existed before the reset.
    pub existed: bool,
    /// Number of filesystem entries removed, root included.
    pub removed: usize,
}

/// Remove `root` and everything beneath it, children before parents.
///
/// A missing root is not an error. Symlinks are removed, never followed.
///
/// # Errors
///
/// Returns `CoreError::Deletion` carrying the first path that could not be
/// listed or removed. Entries removed before the failure stay removed.
pub fn reset_dir(root: &Path) -> Result<ResetOutcome, CoreError> {
    match fs::symlink_metadata(root) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ResetOutcome {
            existed: false,
            removed: 0,
        }),
        Err(source) => Err(CoreError::Deletion {
            path: root.to_path_buf(),
            source,
        }),
        Ok(_) => {
            let removed = remove_tree(root)?;
            tracing::debug!(root = %root.display(), removed, "working directory reset");
            Ok(ResetOutcome {
                existed: true,
                removed,
            })
        }
    }
}

fn remove_tree(path: &Path) -> Result<usize, CoreError> {
    let deletion = |source| CoreError::Deletion {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::symlink_metadata(path).map_err(deletion)?;
    let mut removed = 0;
    if meta.is_dir() {
        for entry in fs::read_dir(path).map_err(deletion)? {
            let entry = entry.map_err(deletion)?;
            removed += remove_tree(&entry.path())?;
        }
        fs::remove_dir(path).map_err(deletion)?;
    } else {
        fs::remove_file(path).map_err(deletion)?;
    }
    Ok(removed + 1)
}

/// Create the parent directory of `file` if needed.
///
/// # Errors
///
/// Returns `CoreError::Io` if the directory cannot be created.
pub fn ensure_parent_dir(file: &Path) -> Result<(), CoreError> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Copy a fixture database byte-for-byte to `to`, replacing any existing file.
///
/// Permissions are carried over by the copy itself; access and modification
/// times are then set to the source's. Returns the number of bytes copied.
///
/// # Errors
///
/// Returns `CoreError::Copy` if the source cannot be read, the destination
/// cannot be written, or its times cannot be set.
pub fn copy_fixture(from: &Path, to: &Path) -> Result<u64, CoreError> {
    let copy_err = |source| CoreError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    ensure_parent_dir(to)?;
    let meta = fs::metadata(from).map_err(copy_err)?;
    let bytes = fs::copy(from, to).map_err(copy_err)?;

    let times = FileTimes::new()
        .set_accessed(meta.accessed().map_err(copy_err)?)
        .set_modified(meta.modified().map_err(copy_err)?);
    File::open(to)
        .and_then(|f| f.set_times(times))
        .map_err(copy_err)?;

    tracing::debug!(from = %from.display(), to = %to.display(), bytes, "fixture copied");
    Ok(bytes)
}

/// Current size of `path` in bytes.
///
/// # Errors
///
/// Returns `CoreError::Io` if the file metadata cannot be read.
pub fn file_len(path: &Path) -> Result<u64, CoreError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_root_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("junit");
        let outcome = reset_dir(&root).unwrap();
        assert_eq!(
            outcome,
            ResetOutcome {
                existed: false,
                removed: 0
            }
        );
    }

    #[test]
    fn removes_nested_tree_and_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("junit");
        fs::create_dir_all(root.join("databases/nested")).unwrap();
        fs::write(root.join("databases/h2-test.db"), b"data").unwrap();
        fs::write(root.join("databases/nested/extra"), b"x").unwrap();
        fs::write(root.join("top.txt"), b"y").unwrap();

        let outcome = reset_dir(&root).unwrap();
        assert!(outcome.existed);
        // root, databases, nested, 3 files
        assert_eq!(outcome.removed, 6);
        assert!(!root.exists());
    }

    #[test]
    fn root_may_be_a_plain_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("junit");
        fs::write(&root, b"not a dir").unwrap();
        assert_eq!(reset_dir(&root).unwrap().removed, 1);
        assert!(!root.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("keep.txt"), b"keep").unwrap();

        let root = dir.path().join("junit");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        reset_dir(&root).unwrap();
        assert!(!root.exists());
        assert!(outside.join("keep.txt").exists());
    }

    #[test]
    fn ensure_parent_dir_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("junit/databases/h2-test.db");
        ensure_parent_dir(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
    }

    #[test]
    fn file_len_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = file_len(&dir.path().join("nope.db")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
