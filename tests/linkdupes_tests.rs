//! End-to-end scenarios driving the build and mutation phases together.

use std::fs;
use std::path::Path;

use linkdupes::actions::{CollapseStats, Collapser};
use linkdupes::config::CollapseMode;
use linkdupes::duplicates::{DuplicateGroup, DuplicateIndex};
use linkdupes::report::format_mib;
use linkdupes::scanner::{Hasher, Walker};
use tempfile::tempdir;

/// Walk `root` and build the finalized groups, returning the hash count
/// alongside for lazy-hash assertions.
fn build_groups(root: &Path) -> (Vec<DuplicateGroup>, usize) {
    let hasher = Hasher::new();
    let mut index = DuplicateIndex::new();
    for entry in Walker::new(root).walk() {
        let file = entry.unwrap();
        index.add_file(file.path, file.size, &hasher).unwrap();
    }
    let hashes = index.hashes_computed();
    (index.finalize(), hashes)
}

fn collapse_all(groups: &[DuplicateGroup], collapser: &Collapser) -> CollapseStats {
    let mut totals = CollapseStats::default();
    for group in groups {
        totals.groups += 1;
        for duplicate in group.duplicates() {
            let record = collapser
                .collapse_pair(group.base(), duplicate, group.size)
                .unwrap();
            totals.record(&record);
        }
    }
    totals
}

/// Sorted recursive listing, for before/after comparisons.
fn listing(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = Walker::new(root)
        .walk()
        .filter_map(Result::ok)
        .map(|f| f.path.display().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_duplicates_form_one_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"content-X!").unwrap();
    fs::write(dir.path().join("b"), b"content-X!").unwrap();
    fs::write(dir.path().join("c"), b"content-Y?").unwrap();

    let (groups, _) = build_groups(dir.path());

    // {a, b} group; c is an inert singleton under its own digest
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 10);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].base(), dir.path().join("a"));

    let collapser = Collapser::new(CollapseMode::Hardlink, true, false);
    let totals = collapse_all(&groups, &collapser);
    assert_eq!(totals.bytes_saved, 10);
    assert_eq!(format_mib(totals.bytes_saved), "0.00MiB");
}

#[test]
fn test_base_selection_is_lexicographic() {
    let dir = tempdir().unwrap();
    // Created in reverse order; discovery order is still sorted
    fs::write(dir.path().join("zz"), b"identical").unwrap();
    fs::write(dir.path().join("aa"), b"identical").unwrap();
    fs::write(dir.path().join("mm"), b"identical").unwrap();

    let (groups, _) = build_groups(dir.path());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].base(), dir.path().join("aa"));
    assert_eq!(
        groups[0].duplicates(),
        &[dir.path().join("mm"), dir.path().join("zz")]
    );
}

#[test]
fn test_unique_sizes_compute_no_hashes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"1").unwrap();
    fs::write(dir.path().join("b"), b"22").unwrap();
    fs::write(dir.path().join("c"), b"333").unwrap();

    let (groups, hashes) = build_groups(dir.path());
    assert!(groups.is_empty());
    assert_eq!(hashes, 0);
}

#[test]
fn test_zero_byte_files_never_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), b"").unwrap();
    fs::write(dir.path().join("empty2"), b"").unwrap();

    let (groups, hashes) = build_groups(dir.path());
    assert!(groups.is_empty());
    assert_eq!(hashes, 0);
}

#[test]
#[cfg(unix)]
fn test_symlinked_files_never_group() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::write(&real, b"linked content").unwrap();
    symlink(&real, dir.path().join("alias")).unwrap();

    let (groups, hashes) = build_groups(dir.path());
    assert!(groups.is_empty());
    assert_eq!(hashes, 0);
}

#[test]
fn test_duplicates_found_across_roots() {
    let dir = tempdir().unwrap();
    let left = dir.path().join("left");
    let right = dir.path().join("right");
    fs::create_dir_all(&left).unwrap();
    fs::create_dir_all(&right).unwrap();
    fs::write(left.join("one"), b"shared bytes").unwrap();
    fs::write(right.join("two"), b"shared bytes").unwrap();

    // One index fed from two walks, the way run_app drives it
    let hasher = Hasher::new();
    let mut index = DuplicateIndex::new();
    for root in [&left, &right] {
        for entry in Walker::new(root).walk() {
            let file = entry.unwrap();
            index.add_file(file.path, file.size, &hasher).unwrap();
        }
    }
    let groups = index.finalize();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
#[cfg(unix)]
fn test_pretend_accounting_matches_live_and_touches_nothing() {
    use std::os::unix::fs::MetadataExt;

    let make_tree = |root: &Path| {
        fs::write(root.join("a"), b"0123456789").unwrap();
        fs::write(root.join("b"), b"0123456789").unwrap();
        fs::write(root.join("c"), b"0123456789").unwrap();
    };

    let dry = tempdir().unwrap();
    make_tree(dry.path());
    let before = listing(dry.path());
    let ino_before = fs::metadata(dry.path().join("b")).unwrap().ino();

    let (groups, _) = build_groups(dry.path());
    let pretend = Collapser::new(CollapseMode::Hardlink, true, false);
    let dry_totals = collapse_all(&groups, &pretend);

    assert_eq!(listing(dry.path()), before);
    assert_eq!(
        fs::metadata(dry.path().join("b")).unwrap().ino(),
        ino_before
    );

    let wet = tempdir().unwrap();
    make_tree(wet.path());
    let (groups, _) = build_groups(wet.path());
    let live = Collapser::new(CollapseMode::Hardlink, false, false);
    let live_totals = collapse_all(&groups, &live);

    assert_eq!(dry_totals.bytes_saved, live_totals.bytes_saved);
    assert_eq!(dry_totals.collapsed, live_totals.collapsed);
    // Two duplicates collapsed against one base
    assert_eq!(live_totals.bytes_saved, 20);
}

#[test]
#[cfg(unix)]
fn test_hardlink_mode_unifies_inodes() {
    use std::os::unix::fs::MetadataExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"hardlink me").unwrap();
    fs::write(dir.path().join("b"), b"hardlink me").unwrap();

    let (groups, _) = build_groups(dir.path());
    let collapser = Collapser::new(CollapseMode::Hardlink, false, false);
    collapse_all(&groups, &collapser);

    let meta_a = fs::metadata(dir.path().join("a")).unwrap();
    let meta_b = fs::metadata(dir.path().join("b")).unwrap();
    assert_eq!(meta_a.dev(), meta_b.dev());
    assert_eq!(meta_a.ino(), meta_b.ino());
    assert_eq!(meta_a.uid(), meta_b.uid());
    assert_eq!(meta_a.gid(), meta_b.gid());
    assert_eq!(meta_a.mode(), meta_b.mode());
    // Content unchanged
    assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"hardlink me");
}

#[test]
#[cfg(unix)]
fn test_remove_mode_prunes_emptied_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("base"), b"only copy soon").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("dup"), b"only copy soon").unwrap();

    let (groups, _) = build_groups(dir.path());
    assert_eq!(groups.len(), 1);

    let collapser = Collapser::new(CollapseMode::Remove, false, false);
    let totals = collapse_all(&groups, &collapser);

    assert_eq!(totals.collapsed, 1);
    assert_eq!(totals.dirs_pruned, 1);
    assert!(!nested.exists());
    assert!(dir.path().join("base").exists());
}

#[test]
#[cfg(unix)]
fn test_remove_mode_with_keep_leaves_empty_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("base"), b"only copy soon").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("dup"), b"only copy soon").unwrap();

    let (groups, _) = build_groups(dir.path());
    let collapser = Collapser::new(CollapseMode::Remove, false, true);
    let totals = collapse_all(&groups, &collapser);

    assert_eq!(totals.dirs_pruned, 0);
    assert!(nested.exists());
    assert!(fs::read_dir(&nested).unwrap().next().is_none());
}

#[test]
fn test_groups_never_mix_sizes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), b"four").unwrap();
    fs::write(dir.path().join("a2"), b"four").unwrap();
    fs::write(dir.path().join("b1"), b"eight888").unwrap();
    fs::write(dir.path().join("b2"), b"eight888").unwrap();

    let (groups, _) = build_groups(dir.path());
    assert_eq!(groups.len(), 2);
    for group in &groups {
        for path in &group.paths {
            assert_eq!(fs::metadata(path).unwrap().len(), group.size);
        }
    }
}
