//! Duplicate detection module.
//!
//! This module provides:
//! - The size-bucketed, lazily-hashed duplicate index ([`index`])
//! - Finalized duplicate groups ([`groups`])
//!
//! The index is built completely - every root walked, every colliding file
//! hashed - before anything downstream reads a group from it. The two
//! phases never overlap.

pub mod groups;
pub mod index;

pub use groups::DuplicateGroup;
pub use index::{BuildStats, DuplicateIndex};
