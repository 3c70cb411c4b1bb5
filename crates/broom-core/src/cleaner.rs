//! Safety-checked file removal. Every record is re-validated against the
//! live filesystem immediately before acting; metadata captured at scan
//! time is never trusted at delete time.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, warn};

use crate::scanner::FileRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Record what would happen without touching the filesystem.
    DryRun,
    /// Move to the platform trash so the files stay recoverable.
    Trash,
    /// Unlink permanently.
    Permanent,
}

/// Why the deleter declined to act on a record. Distinct from a failure:
/// the file was reachable, but no longer what the scan saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Symlink,
    NotRegularFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Symlink => write!(f, "symlink"),
            SkipReason::NotRegularFile => write!(f, "no longer a regular file"),
        }
    }
}

/// Result of a deletion batch. Every input record lands in exactly one of
/// `deleted`, `failed`, or `skipped`; `total_freed` counts deleted records
/// only.
#[derive(Debug, Default)]
pub struct DeletionOutcome {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub total_freed: u64,
}

/// Delete or trash the given files, in input order. Individual failures are
/// recorded and never abort the rest of the batch.
pub fn delete_files(records: &[FileRecord], mode: DeleteMode) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();

    for record in records {
        if mode == DeleteMode::DryRun {
            outcome.deleted.push(record.path.clone());
            outcome.total_freed += record.size;
            continue;
        }

        // Re-stat before acting. The gap between scan and delete can be
        // long, and the path may no longer be the file the scan saw.
        let current = match fs::symlink_metadata(&record.path) {
            Ok(metadata) => metadata,
            Err(err) => {
                outcome.failed.push((record.path.clone(), err.to_string()));
                continue;
            }
        };

        if current.file_type().is_symlink() {
            warn!(
                "refusing to delete '{}': path is now a symlink",
                record.path.display()
            );
            outcome.skipped.push((record.path.clone(), SkipReason::Symlink));
            continue;
        }

        if !current.is_file() {
            warn!(
                "refusing to delete '{}': no longer a regular file",
                record.path.display()
            );
            outcome
                .skipped
                .push((record.path.clone(), SkipReason::NotRegularFile));
            continue;
        }

        let removed = if mode == DeleteMode::Trash {
            trash::delete(&record.path).map_err(|err| err.to_string())
        } else {
            fs::remove_file(&record.path).map_err(|err| err.to_string())
        };

        match removed {
            Ok(()) => {
                debug!("removed '{}'", record.path.display());
                outcome.deleted.push(record.path.clone());
                outcome.total_freed += record.size;
            }
            Err(err) => {
                error!("failed to remove '{}': {}", record.path.display(), err);
                outcome.failed.push((record.path.clone(), err));
            }
        }
    }

    outcome
}
