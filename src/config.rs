//! Run configuration for linkdupes.
//!
//! A single [`RunConfig`] value is built from the parsed CLI and passed
//! explicitly into every phase of the run. There is no ambient state: the
//! verbosity level, the mutation mode and the root list all travel through
//! this struct, and the duplicate index itself is owned by the orchestrator
//! in [`crate::run_app`].

use std::path::PathBuf;

use crate::cli::Cli;

/// What to do with a confirmed duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseMode {
    /// Replace the duplicate with a hardlink to its group's base file.
    Hardlink,
    /// Delete the duplicate outright.
    Remove,
}

/// How much to print while hashing.
///
/// Driven by the counted `-v` flag: once prints each path as it is hashed,
/// twice also prints the resulting digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// No hashing trace.
    Off,
    /// Print each path as it is hashed.
    Paths,
    /// Print each path and its hex digest.
    Digests,
}

impl TraceLevel {
    /// Map a counted `-v` flag to a trace level.
    #[must_use]
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Off,
            1 => Self::Paths,
            _ => Self::Digests,
        }
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root directories to scan. Never empty; defaults to `.`.
    pub roots: Vec<PathBuf>,
    /// Hardlink or remove confirmed duplicates.
    pub mode: CollapseMode,
    /// Dry run: account for savings but never mutate.
    pub pretend: bool,
    /// Keep parent directories emptied by `--remove`.
    pub keep_empty_dirs: bool,
    /// Hashing trace verbosity.
    pub trace: TraceLevel,
}

impl RunConfig {
    /// Build a run configuration from parsed CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let roots = if cli.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            cli.paths.clone()
        };
        Self {
            roots,
            mode: if cli.remove {
                CollapseMode::Remove
            } else {
                CollapseMode::Hardlink
            },
            pretend: cli.pretend,
            keep_empty_dirs: cli.keep,
            trace: TraceLevel::from_count(cli.verbose),
        }
    }
}
