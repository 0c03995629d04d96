//! Pruning directories emptied by duplicate removal.

use std::fs;
use std::path::{Path, PathBuf};

use super::collapse::CollapseError;

/// Delete the removed file's parent directory if it is now empty.
///
/// Checks only the immediate parent - a grandparent emptied transitively
/// is left alone. Returns the pruned directory's path when a deletion
/// happened, `None` when the parent still has entries (or there is no
/// parent directory to speak of). Failure to read or delete the directory
/// is fatal, like every other mutation-phase failure.
pub fn prune_empty_parent(removed: &Path) -> Result<Option<PathBuf>, CollapseError> {
    let Some(dir) = removed.parent() else {
        return Ok(None);
    };
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut entries = fs::read_dir(dir).map_err(|e| CollapseError::PruneDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    if entries.next().is_some() {
        return Ok(None);
    }

    fs::remove_dir(dir).map_err(|e| CollapseError::PruneDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    log::debug!("Pruned empty directory: {}", dir.display());
    Ok(Some(dir.to_path_buf()))
}
