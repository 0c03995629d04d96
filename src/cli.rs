//! Command-line interface definitions for linkdupes.
//!
//! This module defines all CLI arguments using the clap derive API. The
//! surface is intentionally small: root paths plus a handful of mode flags.
//!
//! # Example
//!
//! ```bash
//! # Hardlink duplicates under the current directory
//! linkdupes
//!
//! # Dry run over two trees, tracing every hashed path
//! linkdupes -p -v ~/photos ~/backup/photos
//!
//! # Remove duplicates outright, keeping emptied directories
//! linkdupes -r -k ~/downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Collapse byte-identical files into hardlinks, or remove them.
///
/// linkdupes walks the given directory trees, groups files by size and
/// BLAKE3 content digest, and replaces every duplicate with a hardlink to
/// the first file of its group (or deletes it with `--remove`).
#[derive(Debug, Parser)]
#[command(name = "linkdupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory trees to scan (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Keep empty directories after removing duplicates
    #[arg(short, long)]
    pub keep: bool,

    /// Dry run: detect and report, but never touch the filesystem
    #[arg(short, long)]
    pub pretend: bool,

    /// Remove duplicates instead of hardlinking them
    #[arg(short, long)]
    pub remove: bool,

    /// Print each path as it is hashed (repeat to also print the digest)
    ///
    /// Also raises the log level: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}
