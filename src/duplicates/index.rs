//! The size-bucketed, lazily-hashed duplicate index.
//!
//! # Overview
//!
//! Files are bucketed by exact byte size first, because files of different
//! sizes cannot be duplicates and size comes free with directory metadata.
//! Within a bucket the content digest is computed *lazily*: the first file
//! of a size is parked unhashed, and only when a second file of that size
//! arrives are both hashed. Files whose size is unique in the whole tree -
//! the dominant case on most filesystems - are therefore never read at all.
//!
//! [`BuildStats::hashes_computed`] counts every digest actually computed,
//! which makes the laziness observable: a bucket that never exceeds one
//! member contributes zero.
//!
//! # Example
//!
//! ```no_run
//! use linkdupes::duplicates::DuplicateIndex;
//! use linkdupes::scanner::{Hasher, Walker};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let mut index = DuplicateIndex::new();
//! for entry in Walker::new(Path::new(".")).walk() {
//!     let file = entry.unwrap();
//!     index.add_file(file.path, file.size, &hasher).unwrap();
//! }
//! for group in index.finalize() {
//!     println!("{} x{}", group.digest_hex(), group.len());
//! }
//! ```

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scanner::{Digest, HashError, Hasher};

use super::DuplicateGroup;

/// One size's worth of candidate files.
///
/// The "at most one unhashed entry, and only while the bucket holds
/// exactly one file" invariant is carried by the type: a bucket is either
/// a single parked path or a digest map, never both.
#[derive(Debug)]
enum SizeBucket {
    /// A single file of this size, digest not yet computed.
    Pending(PathBuf),
    /// Two or more files of this size have been seen; every member is
    /// filed under its digest.
    Hashed(BTreeMap<Digest, Vec<PathBuf>>),
}

/// Counters describing one build phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Regular files yielded by the walkers.
    pub files_seen: usize,
    /// Zero-byte files discarded before bucketing.
    pub empty_skipped: usize,
    /// Content digests actually computed (the lazy-hash observable).
    pub hashes_computed: usize,
    /// Parked first-of-size files dropped because they could not be hashed.
    pub pending_dropped: usize,
    /// Recoverable traversal errors warned about.
    pub scan_errors: usize,
    /// Recoverable hashing errors warned about.
    pub hash_errors: usize,
}

impl BuildStats {
    /// True when the build hit any recoverable error.
    #[must_use]
    pub fn had_warnings(&self) -> bool {
        self.scan_errors > 0 || self.hash_errors > 0 || self.pending_dropped > 0
    }
}

/// The in-memory grouping structure.
///
/// Built once during the traversal phase, owned by the run, then consumed
/// by [`finalize`](Self::finalize) - mutation never overlaps construction.
/// `BTreeMap` keying keeps both bucket and digest iteration ordered, so
/// finalized groups (and their bases) come out in a stable order.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    buckets: BTreeMap<u64, SizeBucket>,
    hashes_computed: usize,
    empty_skipped: usize,
    pending_dropped: usize,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File one discovered entry into the index.
    ///
    /// Zero-byte files are discarded. The first file of a new size is
    /// parked without hashing; the arrival of a second file of that size
    /// triggers the deferred hash of the first, then the second is hashed
    /// and filed. Later files of an already-hashed size are hashed
    /// immediately.
    ///
    /// A recoverable [`HashError`] means the *incoming* file could not be
    /// read; the index is left consistent and the caller may continue. If
    /// the deferred hash of a parked file fails, that file is dropped from
    /// the index with a warning and the incoming file is still processed.
    pub fn add_file(
        &mut self,
        path: PathBuf,
        size: u64,
        hasher: &Hasher,
    ) -> Result<(), HashError> {
        if size == 0 {
            log::debug!("Skipping empty file: {}", path.display());
            self.empty_skipped += 1;
            return Ok(());
        }

        match self.buckets.entry(size) {
            Entry::Vacant(slot) => {
                // Unique size so far: park it, don't read it
                slot.insert(SizeBucket::Pending(path));
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let bucket = slot.get_mut();

                // Second file of this size: settle the parked one first
                if matches!(bucket, SizeBucket::Pending(_)) {
                    let SizeBucket::Pending(pending) =
                        std::mem::replace(bucket, SizeBucket::Hashed(BTreeMap::new()))
                    else {
                        unreachable!()
                    };
                    match hasher.hash_file(&pending) {
                        Ok(digest) => {
                            self.hashes_computed += 1;
                            let SizeBucket::Hashed(by_digest) = bucket else {
                                unreachable!()
                            };
                            by_digest.insert(digest, vec![pending]);
                        }
                        Err(e) => {
                            log::warn!("{e}; dropping {} from the index", pending.display());
                            self.pending_dropped += 1;
                        }
                    }
                }

                let digest = hasher.hash_file(&path)?;
                self.hashes_computed += 1;

                let SizeBucket::Hashed(by_digest) = bucket else {
                    unreachable!()
                };
                by_digest.entry(digest).or_default().push(path);
                Ok(())
            }
        }
    }

    /// Content digests computed so far.
    #[must_use]
    pub fn hashes_computed(&self) -> usize {
        self.hashes_computed
    }

    /// Zero-byte files discarded so far.
    #[must_use]
    pub fn empty_skipped(&self) -> usize {
        self.empty_skipped
    }

    /// Parked files dropped because their deferred hash failed.
    #[must_use]
    pub fn pending_dropped(&self) -> usize {
        self.pending_dropped
    }

    /// Number of distinct sizes seen.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Consume the index and yield the finalized duplicate groups.
    ///
    /// Only groups with two or more members survive; parked singletons
    /// and single-member digest entries are inert and dropped. Groups are
    /// ordered by (size, digest), and member order within a group is
    /// discovery order - element 0 is the base.
    #[must_use]
    pub fn finalize(self) -> Vec<DuplicateGroup> {
        let mut groups = Vec::new();
        for (size, bucket) in self.buckets {
            if let SizeBucket::Hashed(by_digest) = bucket {
                for (digest, paths) in by_digest {
                    if paths.len() >= 2 {
                        groups.push(DuplicateGroup::new(digest, size, paths));
                    }
                }
            }
        }
        groups
    }
}
