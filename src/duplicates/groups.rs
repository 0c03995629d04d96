//! Finalized duplicate groups.

use std::path::{Path, PathBuf};

use crate::scanner::{digest_to_hex, Digest};

/// A confirmed group of byte-identical files.
///
/// All members share the same size and the same BLAKE3 content digest.
/// The first path is the *base*: it is never mutated, and every other
/// member is collapsed relative to it. Base identity is fixed when the
/// group is finalized and does not change during the mutation phase.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// BLAKE3 content digest shared by every member
    pub digest: Digest,
    /// File size in bytes shared by every member
    pub size: u64,
    /// Ordered member paths; element 0 is the base
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if `paths` has fewer than two members; the
    /// index never finalizes inert singleton groups.
    #[must_use]
    pub fn new(digest: Digest, size: u64, paths: Vec<PathBuf>) -> Self {
        debug_assert!(paths.len() >= 2, "group must have at least two members");
        Self {
            digest,
            size,
            paths,
        }
    }

    /// The representative file; never mutated.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.paths[0]
    }

    /// Every member except the base, in discovery order.
    #[must_use]
    pub fn duplicates(&self) -> &[PathBuf] {
        &self.paths[1..]
    }

    /// Number of members, base included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// A finalized group always has at least a base and one duplicate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The member digest as lowercase hex.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}
