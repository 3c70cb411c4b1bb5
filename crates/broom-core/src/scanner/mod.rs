mod walk;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use crate::error::Error;
use crate::progress::ProgressReporter;
use walk::BatchProgress;

/// Immutable snapshot of one file's path and stat-derived metadata at scan
/// time. Created once by the scanner and only ever filtered or cloned
/// afterwards.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub accessed: SystemTime,
    pub changed: SystemTime,
}

impl FileRecord {
    /// Stat a path and build a record. Returns `None` for non-regular files
    /// or when the stat fails, mirroring how the scanner treats unreadable
    /// entries.
    pub fn from_path(path: &Path) -> Option<FileRecord> {
        let metadata = fs::symlink_metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        Some(FileRecord::from_metadata(path.to_path_buf(), &metadata))
    }

    pub(crate) fn from_metadata(path: PathBuf, metadata: &fs::Metadata) -> FileRecord {
        FileRecord {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            accessed: metadata.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            changed: status_changed(metadata),
            path,
        }
    }
}

#[cfg(unix)]
fn status_changed(metadata: &fs::Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;
    SystemTime::UNIX_EPOCH
        + Duration::new(metadata.ctime().max(0) as u64, metadata.ctime_nsec() as u32)
}

#[cfg(not(unix))]
fn status_changed(metadata: &fs::Metadata) -> SystemTime {
    // No status-change time outside unix; creation time is the closest stat field.
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Result of a directory scan. File order is unspecified when the scan ran
/// with `concurrency > 1`; the aggregate counters are always exact.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub records: Vec<FileRecord>,
    pub total_size: u64,
    pub skipped_protected: usize,
    pub error_count: usize,
}

impl ScanResult {
    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    fn push(&mut self, record: FileRecord) {
        self.total_size += record.size;
        self.records.push(record);
    }

    fn merge(&mut self, other: ScanResult) {
        self.total_size += other.total_size;
        self.skipped_protected += other.skipped_protected;
        self.error_count += other.error_count;
        self.records.extend(other.records);
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Follow symbolic links while walking. Off by default so the scan never
    /// crosses link boundaries or loops through cycles.
    pub follow_symlinks: bool,
    /// Exclude entries whose name starts with `.`.
    pub skip_hidden: bool,
    /// Count files matched by [`crate::protect::is_protected`] as skipped
    /// instead of emitting them.
    pub respect_protected: bool,
    /// Number of worker threads for the subtree walks. `1` scans sequentially.
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: false,
            respect_protected: true,
            concurrency: 1,
        }
    }
}

/// Scan a directory tree and collect file metadata.
///
/// The only fatal error is a root that does not exist or is not a directory;
/// every per-entry failure is counted in `error_count` and the walk
/// continues.
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    reporter: &dyn ProgressReporter,
) -> Result<ScanResult, Error> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    // Canonicalize once so every emitted record carries an absolute path.
    let root = root.canonicalize()?;

    info!("scanning {}", root.display());
    reporter.on_scan_start();

    let result = if options.concurrency > 1 {
        walk::scan_parallel(root, options, reporter)?
    } else {
        let mut result = ScanResult::default();
        let mut progress = BatchProgress::new(reporter);
        walk::walk_tree(root, options, &mut result, Some(&mut progress));
        result
    };

    reporter.on_scan_complete(result.file_count(), result.total_size);
    Ok(result)
}
