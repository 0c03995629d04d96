//! Collapsing one duplicate pair into a hardlink or a removal.
//!
//! # Overview
//!
//! [`Collapser`] drives each duplicate pair through a short state machine:
//! attribute gate, then - depending on mode and dry-run - hardlink,
//! removal, or pure accounting. Each attempt yields a [`MutationRecord`];
//! the caller prints and tallies them.
//!
//! Errors here are fatal by policy: a failed delete, link or prune aborts
//! the run via [`CollapseError`]. There is no undo - mutations already
//! committed stay committed - and no retry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{CollapseMode, RunConfig};

use super::attrs::attributes_match;
use super::prune::prune_empty_parent;

/// Fatal mutation-phase errors.
#[derive(Debug, Error)]
pub enum CollapseError {
    /// A duplicate file could not be deleted.
    #[error("cannot delete file \"{path}\": {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The replacement hardlink could not be created.
    #[error("cannot create hardlink for \"{base}\" as \"{duplicate}\": {source}")]
    Link {
        base: PathBuf,
        duplicate: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An emptied directory could not be inspected or deleted.
    #[error("cannot delete empty directory \"{path}\": {source}")]
    PruneDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Terminal state of one duplicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairAction {
    /// Duplicate replaced by a hardlink to the base (or would be, in a dry run).
    Hardlinked,
    /// Duplicate deleted (or would be, in a dry run).
    Removed,
    /// Attributes mismatched; pair left untouched.
    Skipped,
}

/// Outcome of one collapse attempt. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    /// The group's base file.
    pub base: PathBuf,
    /// The duplicate this attempt targeted.
    pub duplicate: PathBuf,
    /// What happened.
    pub action: PairAction,
    /// Bytes credited to the savings total (the file size, or 0 on skip).
    pub bytes_saved: u64,
    /// Directory removed by the pruner, if any.
    pub pruned_dir: Option<PathBuf>,
}

/// Running totals for the mutation phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseStats {
    /// Groups visited.
    pub groups: usize,
    /// Duplicates successfully collapsed (hardlinked or removed).
    pub collapsed: usize,
    /// Pairs skipped on attribute mismatch.
    pub skipped: usize,
    /// Emptied directories pruned.
    pub dirs_pruned: usize,
    /// Bytes saved: size x successfully collapsed duplicates.
    pub bytes_saved: u64,
}

impl CollapseStats {
    /// Fold one record into the totals.
    pub fn record(&mut self, record: &MutationRecord) {
        match record.action {
            PairAction::Skipped => self.skipped += 1,
            PairAction::Hardlinked | PairAction::Removed => self.collapsed += 1,
        }
        self.bytes_saved += record.bytes_saved;
        if record.pruned_dir.is_some() {
            self.dirs_pruned += 1;
        }
    }
}

/// Applies the configured mutation to duplicate pairs.
#[derive(Debug, Clone)]
pub struct Collapser {
    mode: CollapseMode,
    pretend: bool,
    keep_empty_dirs: bool,
}

impl Collapser {
    /// Create a collapser.
    #[must_use]
    pub fn new(mode: CollapseMode, pretend: bool, keep_empty_dirs: bool) -> Self {
        Self {
            mode,
            pretend,
            keep_empty_dirs,
        }
    }

    /// Create a collapser from the run configuration.
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.mode, config.pretend, config.keep_empty_dirs)
    }

    /// Collapse one duplicate against its base.
    ///
    /// The attribute gate runs first; a mismatch terminates the pair as
    /// [`PairAction::Skipped`] and is not an error. In pretend mode the
    /// record carries the would-be action and savings but nothing on disk
    /// changes. Live failures are fatal [`CollapseError`]s.
    pub fn collapse_pair(
        &self,
        base: &Path,
        duplicate: &Path,
        size: u64,
    ) -> Result<MutationRecord, CollapseError> {
        if !attributes_match(base, duplicate) {
            return Ok(MutationRecord {
                base: base.to_path_buf(),
                duplicate: duplicate.to_path_buf(),
                action: PairAction::Skipped,
                bytes_saved: 0,
                pruned_dir: None,
            });
        }

        let action = match self.mode {
            CollapseMode::Hardlink => PairAction::Hardlinked,
            CollapseMode::Remove => PairAction::Removed,
        };

        if self.pretend {
            log::debug!(
                "pretend: would collapse {} -> {}",
                duplicate.display(),
                base.display()
            );
            return Ok(MutationRecord {
                base: base.to_path_buf(),
                duplicate: duplicate.to_path_buf(),
                action,
                bytes_saved: size,
                pruned_dir: None,
            });
        }

        fs::remove_file(duplicate).map_err(|e| CollapseError::Remove {
            path: duplicate.to_path_buf(),
            source: e,
        })?;

        let pruned_dir = match self.mode {
            CollapseMode::Remove => {
                if self.keep_empty_dirs {
                    None
                } else {
                    prune_empty_parent(duplicate)?
                }
            }
            CollapseMode::Hardlink => {
                fs::hard_link(base, duplicate).map_err(|e| CollapseError::Link {
                    base: base.to_path_buf(),
                    duplicate: duplicate.to_path_buf(),
                    source: e,
                })?;
                reassert_metadata(base, duplicate);
                None
            }
        };

        Ok(MutationRecord {
            base: base.to_path_buf(),
            duplicate: duplicate.to_path_buf(),
            action,
            bytes_saved: size,
            pruned_dir,
        })
    }
}

/// Re-assert the base's owner, group and mode on the fresh link.
///
/// A hardlink shares its inode's metadata with the base already; this
/// guards against a link primitive that does not guarantee it. Best
/// effort: stat or chown failures here are ignored, matching the
/// advisory nature of the step.
#[cfg(unix)]
fn reassert_metadata(base: &Path, link: &Path) {
    use std::os::unix::fs::{chown, MetadataExt, PermissionsExt};

    if let Ok(meta) = fs::metadata(base) {
        let _ = chown(link, Some(meta.uid()), Some(meta.gid()));
        let _ = fs::set_permissions(link, fs::Permissions::from_mode(meta.mode()));
    }
}

#[cfg(not(unix))]
fn reassert_metadata(_base: &Path, _link: &Path) {}
