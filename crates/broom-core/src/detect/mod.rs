//! Multi-stage duplicate detection: size partition, partial hash, full hash.
//! Each stage only processes survivors of the previous one, so expensive
//! whole-file reads happen for as few files as possible.

mod hash;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::scanner::FileRecord;

/// A group of files confirmed byte-identical by the full-content digest.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub hash: u64,
    pub size: u64,
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    pub fn count(&self) -> usize {
        self.files.len()
    }

    /// Bytes recoverable by keeping only one copy.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.count() as u64 - 1)
    }
}

/// Find groups of byte-identical files among `records`, ignoring files
/// smaller than `min_size`. Groups come back sorted by recoverable bytes,
/// largest first.
///
/// Stage 1 partitions by exact size (different size, never a duplicate).
/// Stage 2 hashes the first 4 KiB and regroups by (size, partial hash).
/// Stage 3 streams the full content through the same digest to confirm.
/// A file whose content cannot be read is dropped from candidacy.
pub fn find_duplicates(records: &[FileRecord], min_size: u64) -> Vec<DuplicateGroup> {
    let mut by_size: HashMap<u64, Vec<&FileRecord>> = HashMap::new();
    for record in records {
        if record.size >= min_size {
            by_size.entry(record.size).or_default().push(record);
        }
    }

    let candidates: Vec<&FileRecord> = by_size
        .into_values()
        .filter(|group| group.len() >= 2)
        .flatten()
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut dropped = 0usize;

    // Size stays part of the key: a truncated-window digest alone cannot
    // distinguish two different-sized files that share a prefix.
    let mut by_partial: HashMap<(u64, u64), Vec<&FileRecord>> = HashMap::new();
    for record in candidates {
        match hash::hash_partial(&record.path) {
            Ok(partial) => by_partial
                .entry((record.size, partial))
                .or_default()
                .push(record),
            Err(err) => {
                warn!(
                    "dropping '{}' from duplicate candidacy: {}",
                    record.path.display(),
                    err
                );
                dropped += 1;
            }
        }
    }

    let survivors: Vec<&FileRecord> = by_partial
        .into_values()
        .filter(|group| group.len() >= 2)
        .flatten()
        .collect();

    let mut by_full: HashMap<u64, Vec<&FileRecord>> = HashMap::new();
    for record in survivors {
        match hash::hash_full(&record.path) {
            Ok(full) => by_full.entry(full).or_default().push(record),
            Err(err) => {
                warn!(
                    "dropping '{}' from duplicate candidacy: {}",
                    record.path.display(),
                    err
                );
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        debug!("{} files dropped from duplicate candidacy by read failures", dropped);
    }

    let mut groups: Vec<DuplicateGroup> = by_full
        .into_iter()
        .filter(|(_, group)| group.len() >= 2)
        .map(|(hash, group)| DuplicateGroup {
            hash,
            size: group[0].size,
            files: group.into_iter().cloned().collect(),
        })
        .collect();

    groups.sort_by(|a, b| b.wasted_bytes().cmp(&a.wasted_bytes()));
    groups
}
