//! Mutation-phase actions.
//!
//! Everything that touches the filesystem lives here:
//! - [`attrs`]: the owner/group/mode/device gate run before any mutation
//! - [`collapse`]: hardlinking or removing one duplicate pair
//! - [`prune`]: deleting directories emptied by a removal
//!
//! Unlike the build phase, failures here are fatal: a delete or link that
//! goes wrong aborts the whole run, and mutations already applied stay
//! applied.

pub mod attrs;
pub mod collapse;
pub mod prune;

pub use attrs::attributes_match;
pub use collapse::{CollapseError, CollapseStats, Collapser, MutationRecord, PairAction};
