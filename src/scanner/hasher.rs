//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes the BLAKE3 digest of a file's contents by streaming
//! it through a fixed-size buffer, so memory stays bounded no matter how
//! large the file is. Equal digests are treated as equal content; the
//! collision probability of a 256-bit cryptographic digest is negligible
//! and no byte-by-byte verification is performed.
//!
//! The hasher also owns the `-v` trace: when enabled it prints each path
//! to stdout as it is hashed, and at the higher level the hex digest too.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::config::TraceLevel;

use super::HashError;

/// A 256-bit BLAKE3 content digest.
pub type Digest = [u8; 32];

/// Buffer size for streaming reads.
pub const HASH_BUF_SIZE: usize = 64 * 1024;

/// Render a digest as lowercase hex.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write as _;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    trace: TraceLevel,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with tracing disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trace: TraceLevel::Off,
        }
    }

    /// Create a hasher with the given trace level.
    #[must_use]
    pub fn with_trace(trace: TraceLevel) -> Self {
        Self { trace }
    }

    /// Hash the contents of the file at `path`.
    ///
    /// Streams the file through a [`HASH_BUF_SIZE`] buffer. Open and read
    /// failures are recoverable [`HashError`]s; the caller decides whether
    /// to log and continue with other files.
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| open_error(path, e))?;

        if self.trace >= TraceLevel::Paths {
            print!("\t{}", path.display());
            let _ = io::stdout().flush();
        }

        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; HASH_BUF_SIZE];
        loop {
            let n = file.read(&mut buf).map_err(|e| HashError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let digest: Digest = *hasher.finalize().as_bytes();

        match self.trace {
            TraceLevel::Off => {}
            TraceLevel::Paths => println!(),
            TraceLevel::Digests => println!(" {}", digest_to_hex(&digest)),
        }

        Ok(digest)
    }
}

fn open_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
