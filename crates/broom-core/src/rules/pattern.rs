use std::collections::HashSet;

use glob::Pattern;

use crate::error::Error;
use crate::scanner::FileRecord;

/// Glob patterns for files that are almost always safe to clean.
pub const DEFAULT_JUNK_PATTERNS: &[&str] = &[
    "*.tmp",
    "*.temp",
    "*.log",
    "*.bak",
    "*.old",
    "*.swp",
    "*.swo",
    "*~",
    "~$*",
    "Thumbs.db",
    "desktop.ini",
    ".DS_Store",
    "*.pyc",
    "__pycache__",
    "*.class",
    "*.o",
    "*.obj",
];

/// Compile user-supplied globs, surfacing the first invalid one as an error.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, Error> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|source| Error::InvalidPattern {
                pattern: raw.clone(),
                source,
            })
        })
        .collect()
}

/// Keep records whose file name matches any pattern, or the complement when
/// `exclude` is set.
pub fn filter_by_pattern(
    records: &[FileRecord],
    patterns: &[Pattern],
    exclude: bool,
) -> Vec<FileRecord> {
    records
        .iter()
        .filter(|record| {
            let name = record
                .path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            let matched = patterns.iter().any(|pattern| pattern.matches(&name));
            matched != exclude
        })
        .cloned()
        .collect()
}

/// Keep records whose extension is in `extensions` (case-insensitive, with
/// or without a leading dot), or the complement when `exclude` is set.
pub fn filter_by_extension(
    records: &[FileRecord],
    extensions: &[String],
    exclude: bool,
) -> Vec<FileRecord> {
    let wanted: HashSet<String> = extensions
        .iter()
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext.strip_prefix('.').map(str::to_string).unwrap_or(ext)
        })
        .collect();

    records
        .iter()
        .filter(|record| {
            let matched = record
                .path
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|ext| wanted.contains(&ext));
            matched != exclude
        })
        .cloned()
        .collect()
}
