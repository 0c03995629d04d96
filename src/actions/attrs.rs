//! File attribute comparison gating every mutation.
//!
//! Two files may only be collapsed when they agree on owner, group,
//! permission bits and residing device. The device check doubles as the
//! hardlink feasibility check: a hardlink cannot cross filesystems.
//!
//! Any stat failure reads as a mismatch - the gate answers `false`, never
//! an error - so a vanished or unreadable file is simply left alone.

use std::path::Path;

/// Check whether two paths agree on owner, group, mode and device.
///
/// Returns `false` when either path cannot be stat'ed. On non-Unix
/// targets there is no owner/mode model to compare, so the gate always
/// answers `false` and nothing is ever mutated.
#[cfg(unix)]
#[must_use]
pub fn attributes_match(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let (meta_a, meta_b) = match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(x), Ok(y)) => (x, y),
        _ => return false,
    };

    meta_a.uid() == meta_b.uid()
        && meta_a.gid() == meta_b.gid()
        && meta_a.mode() == meta_b.mode()
        && meta_a.dev() == meta_b.dev()
}

#[cfg(not(unix))]
#[must_use]
pub fn attributes_match(_a: &Path, _b: &Path) -> bool {
    false
}
