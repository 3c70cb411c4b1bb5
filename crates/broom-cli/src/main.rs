mod commands;
mod logging;
mod progress;
mod report;
mod suggest;

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{ensure, Context};
use clap::Parser;
use colored::*;
use dotenv::dotenv;

use broom_core::config::{load_rules, non_overlapping_directories, RuleConfig};
use broom_core::rules::{age, pattern, size};
use broom_core::{
    delete_files, find_duplicates, scan, DeleteMode, FileRecord, ScanOptions, SilentReporter,
};

use commands::{Cli, Commands, FilterArgs};
use progress::CliReporter;
use report::format_size;

fn main() {
    dotenv().ok();
    let _guard = logging::init_logger();

    let args = Cli::parse();
    let outcome = match args.command {
        Commands::Scan {
            path,
            filters,
            limit,
            threads,
        } => run_scan(&path, &filters, limit, threads),
        Commands::Clean {
            path,
            filters,
            config,
            execute,
            permanent,
            yes,
        } => run_clean(path, &filters, config, execute, permanent, yes),
        Commands::Duplicates {
            path,
            min_size,
            skip_hidden,
            threads,
        } => run_duplicates(&path, min_size, skip_hidden, threads),
        Commands::Suggest => run_suggest(),
    };

    if let Err(err) = outcome {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        process::exit(1);
    }
}

fn scan_options(filters: &FilterArgs, threads: usize) -> ScanOptions {
    ScanOptions {
        skip_hidden: filters.skip_hidden,
        concurrency: threads,
        ..Default::default()
    }
}

fn apply_filters(records: Vec<FileRecord>, filters: &FilterArgs) -> anyhow::Result<Vec<FileRecord>> {
    let mut records = records;

    if let Some(raw) = &filters.older_than {
        records = age::filter_by_age(&records, age::parse_age(raw)?, true);
    }

    if filters.larger_than.is_some() || filters.smaller_than.is_some() {
        let min = filters.larger_than.as_deref().map(size::parse_size).transpose()?;
        let max = filters.smaller_than.as_deref().map(size::parse_size).transpose()?;
        records = size::filter_by_size(&records, min, max);
    }

    if !filters.patterns.is_empty() {
        let patterns = pattern::compile_patterns(&filters.patterns)?;
        records = pattern::filter_by_pattern(&records, &patterns, false);
    }

    Ok(records)
}

fn run_scan(path: &Path, filters: &FilterArgs, limit: usize, threads: usize) -> anyhow::Result<()> {
    let reporter = CliReporter::new();
    let result = scan(path, &scan_options(filters, threads), &reporter)?;

    if filters.is_empty() {
        // No filter: full report plus the top duplicate groups.
        report::print_full_report(&result, limit);
        let groups = find_duplicates(&result.records, 1);
        if !groups.is_empty() {
            report::print_duplicate_report(&groups[..groups.len().min(10)]);
        }
        return Ok(());
    }

    let records = apply_filters(result.records.clone(), filters)?;
    report::print_scan_summary(&result);
    println!();
    report::print_file_table(&records, "Matched Files", limit);
    Ok(())
}

fn run_clean(
    path: Option<PathBuf>,
    filters: &FilterArgs,
    config: Option<PathBuf>,
    execute: bool,
    permanent: bool,
    yes: bool,
) -> anyhow::Result<()> {
    if let Some(config_path) = config {
        return run_clean_config(&config_path, execute, permanent, yes);
    }

    let path = path.context("a directory to clean is required unless --config is given")?;
    ensure!(
        !filters.is_empty(),
        "specify at least one filter (--older-than, --larger-than, --smaller-than, --pattern)"
    );

    let reporter = CliReporter::new();
    let result = scan(&path, &scan_options(filters, 1), &reporter)?;
    let records = apply_filters(result.records, filters)?;

    if records.is_empty() {
        println!("{}", "No files matched the criteria.".green());
        return Ok(());
    }

    report::print_file_table(&records, "Files to Delete", records.len());
    confirm_and_delete(&records, execute, permanent, yes)
}

fn run_clean_config(
    config_path: &Path,
    execute: bool,
    permanent: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let config = load_rules(config_path)?;
    if config.rules.is_empty() {
        println!("{}", "No rules found in config.".yellow());
        return Ok(());
    }

    // Records keyed by absolute path so overlapping rules cannot queue the
    // same file twice.
    let mut matched: HashMap<PathBuf, FileRecord> = HashMap::new();

    for rule in &config.rules {
        println!("\n{}", format!("Rule: {}", rule.name).bold());
        for raw in non_overlapping_directories(rule.paths.clone()) {
            let target = expand_tilde(Path::new(&raw));
            if !target.is_dir() {
                println!("  {}", format!("skipping {raw} (not found)").dimmed());
                continue;
            }

            let options = ScanOptions {
                skip_hidden: rule.skip_hidden,
                ..Default::default()
            };
            let result = scan(&target, &options, &SilentReporter)?;
            let records = apply_rule(result.records, rule)?;
            println!("  {}: {} files matched", target.display(), records.len());

            for record in records {
                matched.insert(record.path.clone(), record);
            }
        }
    }

    let records: Vec<FileRecord> = matched.into_values().collect();
    if records.is_empty() {
        println!("\n{}", "No files matched any rules.".green());
        return Ok(());
    }

    println!();
    report::print_file_table(&records, "All Matched Files", records.len());
    confirm_and_delete(&records, execute, permanent, yes)
}

fn apply_rule(records: Vec<FileRecord>, rule: &RuleConfig) -> anyhow::Result<Vec<FileRecord>> {
    let mut records = records;

    if let Some(raw) = &rule.older_than {
        records = age::filter_by_age(&records, age::parse_age(raw)?, true);
    }

    if rule.larger_than.is_some() || rule.smaller_than.is_some() {
        let min = rule.larger_than.as_deref().map(size::parse_size).transpose()?;
        let max = rule.smaller_than.as_deref().map(size::parse_size).transpose()?;
        records = size::filter_by_size(&records, min, max);
    }

    if !rule.patterns.is_empty() {
        let patterns = pattern::compile_patterns(&rule.patterns)?;
        records = pattern::filter_by_pattern(&records, &patterns, false);
    }

    if !rule.extensions.is_empty() {
        records = pattern::filter_by_extension(&records, &rule.extensions, false);
    }

    Ok(records)
}

fn confirm_and_delete(
    records: &[FileRecord],
    execute: bool,
    permanent: bool,
    yes: bool,
) -> anyhow::Result<()> {
    if !execute {
        let preview = delete_files(records, DeleteMode::DryRun);
        println!(
            "{}",
            format!(
                "[DRY RUN] would delete {} files, freeing {}. Use --execute to delete.",
                preview.deleted.len(),
                format_size(preview.total_freed)
            )
            .yellow()
        );
        return Ok(());
    }

    let total: u64 = records.iter().map(|record| record.size).sum();
    let action = if permanent { "Permanently delete" } else { "Trash" };
    if !yes {
        let question = format!("{} {} files ({})?", action, records.len(), format_size(total));
        if !prompt_confirm(&question, Some(false))? {
            println!("{}", "Cancelled.".dimmed());
            return Ok(());
        }
    }

    let mode = if permanent {
        DeleteMode::Permanent
    } else {
        DeleteMode::Trash
    };
    let outcome = delete_files(records, mode);

    println!(
        "{}",
        format!(
            "Deleted {} files, freed {}.",
            outcome.deleted.len(),
            format_size(outcome.total_freed)
        )
        .green()
    );
    if !outcome.skipped.is_empty() {
        println!(
            "{}",
            format!("Skipped {} files for safety:", outcome.skipped.len()).yellow()
        );
        for (path, reason) in &outcome.skipped {
            println!("  {} ({})", path.display(), reason);
        }
    }
    if !outcome.failed.is_empty() {
        println!(
            "{}",
            format!("Failed to delete {} files:", outcome.failed.len()).red()
        );
        for (path, error) in &outcome.failed {
            println!("  {} ({})", path.display(), error);
        }
    }

    Ok(())
}

fn run_duplicates(path: &Path, min_size: u64, skip_hidden: bool, threads: usize) -> anyhow::Result<()> {
    let options = ScanOptions {
        skip_hidden,
        concurrency: threads,
        ..Default::default()
    };
    let reporter = CliReporter::new();
    let result = scan(path, &options, &reporter)?;

    let groups = find_duplicates(&result.records, min_size);
    report::print_duplicate_report(&groups);
    Ok(())
}

fn run_suggest() -> anyhow::Result<()> {
    let suggestions = suggest::get_suggestions();
    if suggestions.is_empty() {
        println!("{}", "No cleanup suggestions found.".green());
        return Ok(());
    }

    println!("{}", "Cleanup Suggestions".bold());
    let mut total = 0u64;
    for item in &suggestions {
        println!(
            "  {:<24} {:>8} files  {:>12}  {}",
            item.name.cyan(),
            item.file_count,
            format_size(item.size).green(),
            item.description.dimmed(),
        );
        println!("    {}", item.path.display().to_string().dimmed());
        total += item.size;
    }

    println!("\n  Total recoverable: {}", format_size(total).bold());
    println!(
        "  {}",
        "Use 'broom clean <path>' to clean specific directories.".dimmed()
    );
    Ok(())
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{prompt} (Y/n): "),
            Some(false) | None => print!("{prompt} (y/N): "),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
