use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use tracing::debug;

use super::{FileRecord, ScanOptions, ScanResult};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::protect;

const PROGRESS_BATCH: usize = 500;

/// Throttles progress callbacks to one per 500-file batch boundary, always
/// with already-committed totals.
pub(super) struct BatchProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    next_report: usize,
}

impl<'a> BatchProgress<'a> {
    pub(super) fn new(reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            reporter,
            next_report: PROGRESS_BATCH,
        }
    }

    fn observe(&mut self, file_count: usize, total_bytes: u64) {
        if file_count >= self.next_report {
            self.reporter.on_scan_progress(file_count, total_bytes);
            self.next_report = (file_count / PROGRESS_BATCH + 1) * PROGRESS_BATCH;
        }
    }
}

/// Iterative depth-first walk from `start`. An explicit stack bounds call
/// depth on arbitrarily deep trees.
pub(super) fn walk_tree(
    start: PathBuf,
    options: &ScanOptions,
    result: &mut ScanResult,
    mut progress: Option<&mut BatchProgress<'_>>,
) {
    let mut stack = vec![start];
    while let Some(dir) = stack.pop() {
        process_directory(&dir, options, result, &mut stack, progress.as_deref_mut());
    }
}

/// List one directory, emitting regular files into `result` and pushing
/// subdirectories onto `dirs`. Entry type and metadata both come from the
/// directory listing, so a regular file costs no extra stat.
fn process_directory(
    dir: &Path,
    options: &ScanOptions,
    result: &mut ScanResult,
    dirs: &mut Vec<PathBuf>,
    mut progress: Option<&mut BatchProgress<'_>>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("failed to read directory {}: {}", dir.display(), err);
            result.error_count += 1;
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                result.error_count += 1;
                continue;
            }
        };

        if options.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => {
                result.error_count += 1;
                continue;
            }
        };

        let path = entry.path();

        if file_type.is_symlink() {
            if !options.follow_symlinks {
                continue;
            }
            // Resolve through the link; a dangling target is a per-entry error.
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_dir() => dirs.push(path),
                Ok(metadata) if metadata.is_file() => {
                    emit_file(path, &metadata, options, result, progress.as_deref_mut());
                }
                Ok(_) => {}
                Err(_) => result.error_count += 1,
            }
            continue;
        }

        if file_type.is_dir() {
            dirs.push(path);
            continue;
        }

        if !file_type.is_file() {
            // Sockets, fifos, devices: not candidates.
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => {
                emit_file(path, &metadata, options, result, progress.as_deref_mut())
            }
            Err(_) => result.error_count += 1,
        }
    }
}

fn emit_file(
    path: PathBuf,
    metadata: &fs::Metadata,
    options: &ScanOptions,
    result: &mut ScanResult,
    progress: Option<&mut BatchProgress<'_>>,
) {
    if options.respect_protected && protect::is_protected(&path) {
        result.skipped_protected += 1;
        return;
    }
    result.push(FileRecord::from_metadata(path, metadata));
    if let Some(progress) = progress {
        progress.observe(result.file_count(), result.total_size);
    }
}

/// Fan-out/fan-in parallel scan. The root's own listing happens serially
/// (files emitted directly, subdirectories collected), then each top-level
/// subdirectory is walked by a worker on a fixed-size pool. Workers own
/// their local accumulator; the caller merges them in completion order, so
/// the merge is the only serialized step and cross-worker file order is
/// unspecified.
pub(super) fn scan_parallel(
    root: PathBuf,
    options: &ScanOptions,
    reporter: &dyn ProgressReporter,
) -> Result<ScanResult, Error> {
    let mut result = ScanResult::default();
    let mut progress = BatchProgress::new(reporter);

    let mut subdirs = Vec::new();
    process_directory(&root, options, &mut result, &mut subdirs, Some(&mut progress));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.concurrency)
        .build()
        .map_err(|err| Error::Other(err.to_string()))?;

    let (tx, rx) = mpsc::channel::<ScanResult>();
    pool.in_place_scope(|scope| {
        for dir in subdirs {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let mut local = ScanResult::default();
                walk_tree(dir, options, &mut local, None);
                let _ = tx.send(local);
            });
        }
        drop(tx);

        for local in rx {
            result.merge(local);
            progress.observe(result.file_count(), result.total_size);
        }
    });

    Ok(result)
}
