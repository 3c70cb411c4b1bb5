use std::time::{Duration, SystemTime};

use crate::error::Error;
use crate::scanner::FileRecord;

const DAY: u64 = 86_400;
const WEEK: u64 = 604_800;
const MONTH: u64 = 2_592_000; // 30 days
const YEAR: u64 = 31_536_000; // 365 days

/// Parse an age expression like "30d", "8w", "6m", "1y" into a duration.
pub fn parse_age(input: &str) -> Result<Duration, Error> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::InvalidAge(input.to_string()))?;
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(Error::InvalidAge(input.to_string()));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| Error::InvalidAge(input.to_string()))?;

    let unit_seconds = match unit.trim().to_ascii_lowercase().as_str() {
        "d" => DAY,
        "w" => WEEK,
        "m" => MONTH,
        "y" => YEAR,
        _ => return Err(Error::InvalidAge(input.to_string())),
    };

    Ok(Duration::from_secs(value * unit_seconds))
}

/// Keep records older than `max_age`, judged by modification time, or by
/// access time when `use_mtime` is false.
pub fn filter_by_age(records: &[FileRecord], max_age: Duration, use_mtime: bool) -> Vec<FileRecord> {
    let threshold = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    records
        .iter()
        .filter(|record| {
            let timestamp = if use_mtime {
                record.modified
            } else {
                record.accessed
            };
            timestamp < threshold
        })
        .cloned()
        .collect()
}
