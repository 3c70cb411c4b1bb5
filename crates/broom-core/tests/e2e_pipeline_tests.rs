use std::fs;
use std::path::Path;

use tempfile::tempdir;

use broom_core::rules::pattern::{compile_patterns, filter_by_pattern};
use broom_core::{
    delete_files, find_duplicates, scan, DeleteMode, ScanOptions, SilentReporter,
};

/// Create a temp directory tree with known duplicates.
/// Layout:
///   root/
///     folder_a/
///       unique_a.txt     ("unique content a")
///       shared.txt       ("shared content xyz")
///     folder_b/
///       unique_b.txt     ("unique content b")
///       shared.txt       ("shared content xyz")  ← duplicate of folder_a/shared.txt
///     folder_c/
///       large_dup_1.bin  (8KB of 0xAA)
///       large_dup_2.bin  (8KB of 0xAA)            ← duplicate within same folder
fn create_test_tree(root: &Path) {
    let folder_a = root.join("folder_a");
    let folder_b = root.join("folder_b");
    let folder_c = root.join("folder_c");
    fs::create_dir_all(&folder_a).unwrap();
    fs::create_dir_all(&folder_b).unwrap();
    fs::create_dir_all(&folder_c).unwrap();

    fs::write(folder_a.join("unique_a.txt"), "unique content a").unwrap();
    fs::write(folder_b.join("unique_b.txt"), "unique content b").unwrap();

    fs::write(folder_a.join("shared.txt"), "shared content xyz").unwrap();
    fs::write(folder_b.join("shared.txt"), "shared content xyz").unwrap();

    // Larger than the partial-hash window, to exercise the full-hash stage.
    let large_content = vec![0xAAu8; 8192];
    fs::write(folder_c.join("large_dup_1.bin"), &large_content).unwrap();
    fs::write(folder_c.join("large_dup_2.bin"), &large_content).unwrap();
}

#[test]
fn test_scan_then_detect_finds_both_groups() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    create_test_tree(&root);

    let result = scan(&root, &ScanOptions::default(), &SilentReporter).unwrap();
    assert_eq!(result.file_count(), 6);

    let groups = find_duplicates(&result.records, 1);
    assert_eq!(groups.len(), 2, "expected shared.txt and the large pair");

    // Sorted by wasted bytes: the 8KB pair first.
    assert_eq!(groups[0].size, 8192);
    assert_eq!(groups[0].wasted_bytes(), 8192);
    assert_eq!(groups[1].size, 18);
    assert_eq!(groups[1].wasted_bytes(), 18);
    for group in &groups {
        assert_eq!(group.count(), 2);
    }
}

#[test]
fn test_two_identical_small_files_among_three() {
    // Files of sizes 10, 10, 20 where the 10-byte files are byte-identical:
    // exactly one group of 2, wasted bytes 10.
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("one.txt"), "0123456789").unwrap();
    fs::write(tmp.path().join("two.txt"), "0123456789").unwrap();
    fs::write(tmp.path().join("big.txt"), "abcdefghijklmnopqrst").unwrap();

    let result = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let groups = find_duplicates(&result.records, 1);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count(), 2);
    assert_eq!(groups[0].wasted_bytes(), 10);
}

#[test]
fn test_dry_run_previews_whole_directory() {
    let tmp = tempdir().unwrap();
    let mut expected_total = 0u64;
    for i in 0..5 {
        let content = "y".repeat(10 + i);
        expected_total += content.len() as u64;
        fs::write(tmp.path().join(format!("file{i}.txt")), content).unwrap();
    }

    let result = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let outcome = delete_files(&result.records, DeleteMode::DryRun);

    assert_eq!(outcome.deleted.len(), 5);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.total_freed, expected_total);

    let after = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    assert_eq!(after.file_count(), 5, "dry run must leave the tree intact");
}

#[test]
fn test_out_of_band_deletion_surfaces_as_failure() {
    let tmp = tempdir().unwrap();
    create_test_tree(tmp.path());

    let result = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let doomed: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.path.ends_with("unique_a.txt"))
        .cloned()
        .collect();
    assert_eq!(doomed.len(), 1);

    fs::remove_file(&doomed[0].path).unwrap();

    let outcome = delete_files(&doomed, DeleteMode::Permanent);
    assert!(outcome.deleted.is_empty());
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.failed.len(), 1);
}

#[test]
fn test_keep_one_copy_per_group() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("dedupe_root");
    create_test_tree(&root);

    let result = scan(&root, &ScanOptions::default(), &SilentReporter).unwrap();
    let groups = find_duplicates(&result.records, 1);

    // Keep the first path per group (sorted), delete the rest.
    let mut doomed = Vec::new();
    for group in &groups {
        let mut members = group.files.clone();
        members.sort_by(|a, b| a.path.cmp(&b.path));
        doomed.extend(members.into_iter().skip(1));
    }

    let outcome = delete_files(&doomed, DeleteMode::Permanent);
    assert_eq!(outcome.deleted.len(), 2);
    assert!(outcome.failed.is_empty());

    let rescan = scan(&root, &ScanOptions::default(), &SilentReporter).unwrap();
    assert_eq!(rescan.file_count(), 4);
    assert!(find_duplicates(&rescan.records, 1).is_empty());
}

#[test]
fn test_filtered_clean_pipeline() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("build.log"), "log line").unwrap();
    fs::write(tmp.path().join("scratch.tmp"), "scratch").unwrap();
    fs::write(tmp.path().join("keep.rs"), "fn main() {}").unwrap();

    let result = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let patterns = compile_patterns(&["*.log".to_string(), "*.tmp".to_string()]).unwrap();
    let junk = filter_by_pattern(&result.records, &patterns, false);
    assert_eq!(junk.len(), 2);

    let outcome = delete_files(&junk, DeleteMode::Permanent);
    assert_eq!(outcome.deleted.len(), 2);

    let after = scan(tmp.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    assert_eq!(after.file_count(), 1);
    assert!(after.records[0].path.ends_with("keep.rs"));
}
