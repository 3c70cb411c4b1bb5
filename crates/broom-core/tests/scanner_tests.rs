use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::tempdir;

use broom_core::{scan, FileRecord, ProgressReporter, ScanOptions, SilentReporter};

fn scan_default(root: &Path) -> broom_core::ScanResult {
    scan(root, &ScanOptions::default(), &SilentReporter).unwrap()
}

#[test]
fn test_scan_empty_dir() {
    let tmp = tempdir().unwrap();
    let result = scan_default(tmp.path());
    assert_eq!(result.file_count(), 0);
    assert_eq!(result.total_size, 0);
    assert_eq!(result.error_count, 0);
}

#[test]
fn test_scan_counts_files_and_bytes() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("a.txt"), "aaa").unwrap();
    fs::write(tmp.path().join("b.txt"), "bbbbb").unwrap();

    let result = scan_default(tmp.path());
    assert_eq!(result.file_count(), 2);
    assert_eq!(result.total_size, 8);
}

#[test]
fn test_total_size_matches_sum_of_records() {
    let tmp = tempdir().unwrap();
    for i in 0..10 {
        fs::write(tmp.path().join(format!("f{i}.bin")), vec![0u8; i * 7]).unwrap();
    }

    let result = scan_default(tmp.path());
    let summed: u64 = result.records.iter().map(|r| r.size).sum();
    assert_eq!(result.total_size, summed);
    assert_eq!(result.file_count(), result.records.len());
}

#[test]
fn test_scan_recurses_into_subdirectories() {
    let tmp = tempdir().unwrap();
    let sub = tmp.path().join("sub").join("deeper");
    fs::create_dir_all(&sub).unwrap();
    fs::write(tmp.path().join("a.txt"), "a").unwrap();
    fs::write(sub.join("b.txt"), "b").unwrap();

    let result = scan_default(tmp.path());
    assert_eq!(result.file_count(), 2);
}

#[test]
fn test_record_paths_are_absolute() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("a.txt"), "a").unwrap();

    let result = scan_default(tmp.path());
    assert!(result.records[0].path.is_absolute());
}

#[test]
fn test_skip_hidden_files_and_directories() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("visible.txt"), "v").unwrap();
    fs::write(tmp.path().join(".hidden.txt"), "h").unwrap();
    let hidden_dir = tmp.path().join(".cache");
    fs::create_dir(&hidden_dir).unwrap();
    fs::write(hidden_dir.join("inside.txt"), "i").unwrap();

    let options = ScanOptions {
        skip_hidden: true,
        ..Default::default()
    };
    let result = scan(tmp.path(), &options, &SilentReporter).unwrap();
    assert_eq!(result.file_count(), 1);
    assert!(result.records[0].path.ends_with("visible.txt"));

    // Without the option everything is visible.
    let all = scan_default(tmp.path());
    assert_eq!(all.file_count(), 3);
}

#[test]
fn test_missing_root_is_fatal() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");
    assert!(scan(&missing, &ScanOptions::default(), &SilentReporter).is_err());
}

#[test]
fn test_file_root_is_fatal() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(scan(&file, &ScanOptions::default(), &SilentReporter).is_err());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_crossed_by_default() {
    use std::os::unix::fs::symlink;

    let tmp = tempdir().unwrap();
    let target = tmp.path().join("target.txt");
    fs::write(&target, "content").unwrap();
    symlink(&target, tmp.path().join("link.txt")).unwrap();

    let other = tempdir().unwrap();
    fs::write(other.path().join("far.txt"), "far").unwrap();
    symlink(other.path(), tmp.path().join("linked_dir")).unwrap();

    let result = scan_default(tmp.path());
    assert_eq!(result.file_count(), 1, "only the real file should be seen");

    let follow = ScanOptions {
        follow_symlinks: true,
        ..Default::default()
    };
    let followed = scan(tmp.path(), &follow, &SilentReporter).unwrap();
    // target.txt, link.txt resolved, and far.txt through the linked dir
    assert_eq!(followed.file_count(), 3);
}

#[test]
fn test_parallel_scan_matches_sequential_aggregates() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("root.txt"), "rr").unwrap();
    for d in 0..4 {
        let sub = tmp.path().join(format!("sub{d}"));
        fs::create_dir(&sub).unwrap();
        for i in 0..25 {
            fs::write(sub.join(format!("f{i}.bin")), vec![b'x'; d * 100 + i]).unwrap();
        }
    }

    let sequential = scan_default(tmp.path());
    let parallel = scan(
        tmp.path(),
        &ScanOptions {
            concurrency: 4,
            ..Default::default()
        },
        &SilentReporter,
    )
    .unwrap();

    assert_eq!(parallel.file_count(), sequential.file_count());
    assert_eq!(parallel.total_size, sequential.total_size);
    assert_eq!(parallel.error_count, sequential.error_count);

    // Same file set regardless of merge order.
    let mut seq_paths: Vec<_> = sequential.records.iter().map(|r| r.path.clone()).collect();
    let mut par_paths: Vec<_> = parallel.records.iter().map(|r| r.path.clone()).collect();
    seq_paths.sort();
    par_paths.sort();
    assert_eq!(seq_paths, par_paths);
}

struct RecordingReporter {
    calls: Mutex<Vec<(usize, u64)>>,
}

impl ProgressReporter for RecordingReporter {
    fn on_scan_progress(&self, file_count: usize, total_bytes: u64) {
        self.calls.lock().unwrap().push((file_count, total_bytes));
    }
}

#[test]
fn test_progress_fires_once_per_batch_boundary() {
    let tmp = tempdir().unwrap();
    for i in 0..1200 {
        fs::write(tmp.path().join(format!("f{i}.txt")), "x").unwrap();
    }

    let reporter = RecordingReporter {
        calls: Mutex::new(Vec::new()),
    };
    let result = scan(tmp.path(), &ScanOptions::default(), &reporter).unwrap();
    assert_eq!(result.file_count(), 1200);

    let calls = reporter.calls.lock().unwrap();
    let counts: Vec<usize> = calls.iter().map(|(count, _)| *count).collect();
    assert_eq!(counts, vec![500, 1000]);
    // Committed bytes only: one byte per file at each boundary.
    assert_eq!(calls[0].1, 500);
    assert_eq!(calls[1].1, 1000);
}

#[test]
fn test_file_record_from_path() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("test.txt");
    fs::write(&file, "hello").unwrap();

    let record = FileRecord::from_path(&file).unwrap();
    assert_eq!(record.size, 5);
    assert_eq!(record.path, file);

    assert!(FileRecord::from_path(Path::new("/nonexistent/file.txt")).is_none());
    assert!(FileRecord::from_path(tmp.path()).is_none());
}
