//! linkdupes - Hardlink (or remove) duplicate files
//!
//! A sequential CLI tool that finds byte-identical files under one or more
//! directory trees using size-bucketed, lazily-hashed BLAKE3 grouping, then
//! reclaims space by replacing each duplicate with a hardlink to its
//! group's base file - or deleting it outright.
//!
//! The run has exactly two phases: the *build* phase walks every root and
//! fills the [`duplicates::DuplicateIndex`]; the *mutation* phase consumes
//! the finalized groups. Build-phase errors are recoverable warnings;
//! mutation-phase errors are fatal and abort the run.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;

use anyhow::Result;
use bytesize::ByteSize;

use actions::{CollapseStats, Collapser, PairAction};
use cli::Cli;
use config::RunConfig;
use duplicates::{BuildStats, DuplicateGroup, DuplicateIndex};
use error::ExitCode;
use scanner::{Hasher, Walker};

/// Run the whole application: build phase, mutation phase, report.
///
/// Returns the exit code on completion; a fatal mutation-phase error
/// propagates as `Err`. Recoverable build-phase errors are warned about
/// and do not affect the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }
    let config = RunConfig::from_cli(&cli);

    report::print_build_banner();
    let (index, stats) = build_index(&config);
    log::debug!(
        "Build phase: {} files seen, {} empty skipped, {} hashed across {} size buckets",
        stats.files_seen,
        stats.empty_skipped,
        stats.hashes_computed,
        index.bucket_count()
    );
    if stats.had_warnings() {
        log::warn!(
            "Build phase finished with warnings: {} unreadable entries, {} unhashable files",
            stats.scan_errors,
            stats.hash_errors + stats.pending_dropped
        );
    }

    let groups = index.finalize();

    report::print_mutation_banner(config.mode);
    let totals = collapse_groups(&groups, &config)?;
    log::debug!(
        "Mutation phase: {} duplicates collapsed in {} groups, {} pairs skipped, {} reclaimed",
        totals.collapsed,
        totals.groups,
        totals.skipped,
        ByteSize::b(totals.bytes_saved)
    );

    report::print_summary(totals.bytes_saved);
    Ok(ExitCode::Success)
}

/// Build phase: walk every root and fill the index.
///
/// Recoverable errors (unreadable subtree, unhashable file) are logged as
/// warnings, counted, and never end the phase.
fn build_index(config: &RunConfig) -> (DuplicateIndex, BuildStats) {
    let hasher = Hasher::with_trace(config.trace);
    let mut index = DuplicateIndex::new();
    let mut stats = BuildStats::default();

    for root in &config.roots {
        log::debug!("Walking {}", root.display());
        let walker = Walker::new(root);
        for entry in walker.walk() {
            match entry {
                Ok(file) => {
                    stats.files_seen += 1;
                    if let Err(e) = index.add_file(file.path, file.size, &hasher) {
                        log::warn!("{e}");
                        stats.hash_errors += 1;
                    }
                }
                Err(e) => {
                    log::warn!("{e}");
                    stats.scan_errors += 1;
                }
            }
        }
    }

    stats.empty_skipped = index.empty_skipped();
    stats.hashes_computed = index.hashes_computed();
    stats.pending_dropped = index.pending_dropped();
    (index, stats)
}

/// Mutation phase: print and collapse every finalized group.
///
/// The index was fully built before this runs; groups are only read here.
/// The first fatal error aborts the phase, leaving earlier mutations in
/// place.
fn collapse_groups(
    groups: &[DuplicateGroup],
    config: &RunConfig,
) -> Result<CollapseStats, actions::CollapseError> {
    let collapser = Collapser::from_config(config);
    let mut totals = CollapseStats::default();

    for (number, group) in groups.iter().enumerate() {
        totals.groups += 1;
        log::debug!(
            "Group {}: {} members of {} ({})",
            number + 1,
            group.len(),
            ByteSize::b(group.size),
            group.digest_hex()
        );
        report::print_group_header(number + 1, group.base());

        for duplicate in group.duplicates() {
            report::print_duplicate(duplicate);
            let record = collapser.collapse_pair(group.base(), duplicate, group.size)?;
            if record.action == PairAction::Skipped {
                report::print_mismatch(group.base(), duplicate);
            }
            if let Some(dir) = &record.pruned_dir {
                report::print_pruned(dir);
            }
            totals.record(&record);
        }
    }

    Ok(totals)
}
