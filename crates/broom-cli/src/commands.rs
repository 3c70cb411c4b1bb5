use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "broom", version)]
#[command(about = "Clean up old, large, and duplicate files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Keep only files older than this (e.g. 30d, 6m, 1y)
    #[arg(short = 'o', long)]
    pub older_than: Option<String>,

    /// Keep only files larger than this (e.g. 100MB, 1GB)
    #[arg(short = 'l', long)]
    pub larger_than: Option<String>,

    /// Keep only files smaller than this (e.g. 1KB)
    #[arg(short = 's', long)]
    pub smaller_than: Option<String>,

    /// Glob patterns to match against file names (e.g. '*.tmp'); repeatable
    #[arg(short = 'p', long = "pattern")]
    pub patterns: Vec<String>,

    /// Skip hidden files and directories
    #[arg(long)]
    pub skip_hidden: bool,
}

impl FilterArgs {
    pub fn is_empty(&self) -> bool {
        self.older_than.is_none()
            && self.larger_than.is_none()
            && self.smaller_than.is_none()
            && self.patterns.is_empty()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and report files matching criteria
    Scan {
        /// Directory to scan
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum files to show per table
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Scanner worker threads (1 = sequential)
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,
    },
    /// Show files matching criteria; delete them with --execute
    Clean {
        /// Directory to clean (not needed with --config)
        path: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// YAML rule file to drive the cleanup
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Actually delete files; without this flag only a dry-run preview runs
        #[arg(short = 'x', long)]
        execute: bool,

        /// Permanently delete instead of moving to the trash
        #[arg(long)]
        permanent: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Find byte-identical duplicate files
    Duplicates {
        /// Directory to scan for duplicates
        path: PathBuf,

        /// Minimum file size in bytes to consider
        #[arg(long, default_value_t = 1024)]
        min_size: u64,

        /// Skip hidden files and directories
        #[arg(long)]
        skip_hidden: bool,

        /// Scanner worker threads (1 = sequential)
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,
    },
    /// Suggest system directories worth cleaning
    Suggest,
}
