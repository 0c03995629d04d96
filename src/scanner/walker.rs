//! Sequential directory walker built on `walkdir`.
//!
//! # Overview
//!
//! [`Walker`] traverses one directory tree and yields every regular file
//! under it as a [`FileEntry`]. Symbolic links are never followed and
//! never yielded, whether they point at files or directories. Failures
//! (unreadable directory, vanished entry) are yielded as recoverable
//! [`ScanError`] values, so a bad subtree never ends the walk of its
//! siblings.
//!
//! Entries within each directory are visited in lexicographic file-name
//! order, which makes group membership - and therefore base selection
//! downstream - deterministic across runs and platforms.
//!
//! # Example
//!
//! ```no_run
//! use linkdupes::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/photos"));
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileEntry, ScanError};

/// Sequential, read-only directory walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Walk the tree, yielding regular-file entries.
    ///
    /// Restartable: each call starts a fresh traversal from the root.
    /// The walk itself performs no filesystem mutation.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    // Symlinks are skipped outright, never dereferenced
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }
                    if !file_type.is_file() {
                        return None;
                    }

                    match entry.metadata() {
                        Ok(metadata) => {
                            Some(Ok(FileEntry::new(entry.into_path(), metadata.len())))
                        }
                        Err(e) => Some(Err(map_walkdir_error(entry.path().to_path_buf(), e))),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    Some(Err(map_walkdir_error(path, e)))
                }
            })
    }
}

/// Convert a walkdir error into a [`ScanError`], classifying by I/O kind.
fn map_walkdir_error(path: PathBuf, error: walkdir::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.io_error().map(std::io::Error::kind) {
        Some(ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
        Some(ErrorKind::NotFound) => ScanError::NotFound(path),
        _ => ScanError::Io {
            path,
            source: error
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let mut f = File::create(dir.path().join("file2.txt")).unwrap();
        writeln!(f, "Another file").unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let mut f = File::create(subdir.join("nested.txt")).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    #[test]
    fn test_walker_finds_files() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path());

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.size > 0);
            assert!(file.path.exists());
        }
    }

    #[test]
    fn test_walker_yields_empty_files() {
        // Empty files are the index's business to discard, not the walker's
        let dir = create_test_dir();
        File::create(dir.path().join("empty.txt")).unwrap();

        let walker = Walker::new(dir.path());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|f| f.size == 0));
    }

    #[test]
    fn test_walker_is_deterministic() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path());

        let first: Vec<_> = walker.walk().filter_map(Result::ok).collect();
        let second: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(first, second);

        // Lexicographic within a directory
        let names: Vec<_> = first
            .iter()
            .filter(|f| f.path.parent() == Some(dir.path()))
            .map(|f| f.path.file_name().unwrap().to_os_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_skips_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(
            dir.path().join("file1.txt"),
            dir.path().join("link_to_file.txt"),
        )
        .unwrap();
        symlink(dir.path().join("subdir"), dir.path().join("link_to_dir")).unwrap();

        let walker = Walker::new(dir.path());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        // Only the three real files; neither symlink is followed or yielded
        assert_eq!(files.len(), 3);
        for file in &files {
            let name = file.path.file_name().unwrap().to_str().unwrap();
            assert!(!name.starts_with("link_"));
        }
    }

    #[test]
    fn test_walker_handles_nonexistent_root() {
        let walker = Walker::new(Path::new("/nonexistent/path/12345"));

        let results: Vec<_> = walker.walk().collect();

        // Errors, not panics; and nothing yielded as a file
        assert!(!results.is_empty());
        assert!(results.iter().all(Result::is_err));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_reports_unreadable_subtree_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = create_test_dir();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let mut f = File::create(locked.join("hidden.txt")).unwrap();
        writeln!(f, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; the scenario only works unprivileged
        if effective_uid() == Some(0) {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let walker = Walker::new(dir.path());
        let results: Vec<_> = walker.walk().collect();
        let ok_count = results.iter().filter(|r| r.is_ok()).count();
        let err_count = results.iter().filter(|r| r.is_err()).count();

        // The three readable files still come through, plus an error for
        // the locked subtree
        assert_eq!(ok_count, 3);
        assert!(err_count >= 1);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Owner of a file this process just created == effective uid.
    #[cfg(unix)]
    fn effective_uid() -> Option<u32> {
        use std::os::unix::fs::MetadataExt;
        let dir = TempDir::new().ok()?;
        let probe = dir.path().join("probe");
        File::create(&probe).ok()?;
        fs::metadata(&probe).ok().map(|m| m.uid())
    }
}
