//! Scanner module for directory traversal and file hashing.
//!
//! This module provides:
//! - Sequential directory walking via `walkdir` ([`walker`])
//! - Streaming BLAKE3 content hashing ([`hasher`])
//!
//! Both halves report failures as recoverable errors: an unreadable
//! subtree or an unopenable file is warned about by the caller and the
//! build phase continues with the rest of the tree.
//!
//! # Example
//!
//! ```no_run
//! use linkdupes::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{digest_to_hex, Digest, Hasher, HASH_BUF_SIZE};
pub use walker::Walker;

/// A discovered regular file: its path and exact byte size.
///
/// Everything else the pipeline needs (content digest, owner, mode) is
/// read lazily, later, and only for files that might actually collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new file entry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Recoverable errors raised while walking a directory tree.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable errors raised while hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
