//! The stdout report surface.
//!
//! Everything the user reads on a normal run goes through here: phase
//! banners, one "Group N:" block per duplicate group with the base marked
//! `*`, a mismatch line per skipped pair, a line per pruned directory and
//! the final savings summary. Warnings and debug chatter go through the
//! `log` channel to stderr instead, so the report stays parseable.
//!
//! Color is applied with `yansi` and honors `--no-color` / `NO_COLOR`
//! (disabled globally in [`crate::run_app`]).

use std::path::Path;

use yansi::Paint;

use crate::config::CollapseMode;

/// Banner opening the build (traversal + hashing) phase.
pub fn print_build_banner() {
    println!("Building hash map...");
}

/// Banner opening the mutation phase.
pub fn print_mutation_banner(mode: CollapseMode) {
    match mode {
        CollapseMode::Hardlink => println!("Hard-linking..."),
        CollapseMode::Remove => println!("Removing..."),
    }
}

/// Header for one duplicate group; the base is marked with `*`.
pub fn print_group_header(number: usize, base: &Path) {
    println!("{}", format!("Group {number}:").bold());
    println!("*\t{}", base.display().green());
}

/// One duplicate member, listed under its group header.
pub fn print_duplicate(path: &Path) {
    println!("\t{}", path.display());
}

/// A pair skipped by the attribute gate. Printed once per pair.
pub fn print_mismatch(base: &Path, duplicate: &Path) {
    println!(
        "{}",
        format!(
            "Owner/mode mismatch {} and {}",
            base.display(),
            duplicate.display()
        )
        .yellow()
    );
}

/// A directory deleted because removal emptied it.
pub fn print_pruned(dir: &Path) {
    println!("Empty directory removed {}", dir.display());
}

/// Closing summary with the savings total.
pub fn print_summary(bytes_saved: u64) {
    println!("Done!");
    println!("Saved {}", format_mib(bytes_saved).green().bold());
}

/// Fixed-format savings figure: MiB with two decimal digits.
#[must_use]
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2}MiB", bytes as f64 / (1024.0 * 1024.0))
}
