use std::path::Path;
use std::time::SystemTime;

use broom_core::rules::size::sort_by_size;
use broom_core::{DuplicateGroup, FileRecord, ScanResult};
use chrono::{DateTime, Local};
use colored::*;

pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

pub fn format_time(timestamp: SystemTime) -> String {
    DateTime::<Local>::from(timestamp)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn print_scan_summary(result: &ScanResult) {
    println!(
        "{} files  |  {} total  |  {}",
        result.file_count().to_string().bold(),
        format_size(result.total_size).bold(),
        format!(
            "{} protected-skipped, {} errors",
            result.skipped_protected, result.error_count
        )
        .dimmed(),
    );
}

pub fn print_file_table(records: &[FileRecord], title: &str, limit: usize) {
    println!("{}", title.bold());
    for record in records.iter().take(limit) {
        println!(
            "  {:<64} {:>12}  {}",
            truncate_path(&record.path, 64).cyan(),
            format_size(record.size).green(),
            format_time(record.modified).yellow(),
        );
    }
    if records.len() > limit {
        println!(
            "  {}",
            format!("... and {} more", records.len() - limit).dimmed()
        );
    }

    let total: u64 = records.iter().map(|r| r.size).sum();
    println!(
        "  Total: {} files, {}\n",
        records.len().to_string().bold(),
        format_size(total).bold(),
    );
}

pub fn print_duplicate_report(groups: &[DuplicateGroup]) {
    if groups.is_empty() {
        println!("{}", "No duplicate files found.".green());
        return;
    }

    let total_wasted: u64 = groups.iter().map(|g| g.wasted_bytes()).sum();
    println!(
        "{}",
        format!(
            "{} duplicate groups  |  {} recoverable",
            groups.len(),
            format_size(total_wasted)
        )
        .bold(),
    );

    for (i, group) in groups.iter().enumerate() {
        println!(
            "\n  Group {} — {} x {} copies",
            i + 1,
            format_size(group.size),
            group.count(),
        );
        for (j, record) in group.files.iter().enumerate() {
            println!(
                "    {:>2}. {}  {}",
                j + 1,
                record.path.display().to_string().cyan(),
                format_time(record.modified).dimmed(),
            );
        }
    }
    println!();
}

/// Comprehensive report: summary, largest files, oldest files.
pub fn print_full_report(result: &ScanResult, limit: usize) {
    print_scan_summary(result);
    println!();

    if result.records.is_empty() {
        println!("{}", "No files to report.".dimmed());
        return;
    }

    let by_size = sort_by_size(&result.records, true);
    print_file_table(&by_size, "Largest Files", limit);

    let mut by_age = result.records.clone();
    by_age.sort_by_key(|record| record.modified);
    print_file_table(&by_age, "Oldest Files", limit);
}

fn truncate_path(path: &Path, width: usize) -> String {
    let rendered = path.display().to_string();
    if rendered.chars().count() <= width {
        return rendered;
    }
    let tail: String = rendered
        .chars()
        .rev()
        .take(width - 1)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
