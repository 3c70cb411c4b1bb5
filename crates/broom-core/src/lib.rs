pub mod cleaner;
pub mod config;
pub mod detect;
pub mod error;
pub mod progress;
pub mod protect;
pub mod rules;
pub mod scanner;

pub use cleaner::{delete_files, DeleteMode, DeletionOutcome, SkipReason};
pub use config::{load_rules, CleanConfig, RuleConfig};
pub use detect::{find_duplicates, DuplicateGroup};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use protect::is_protected;
pub use scanner::{scan, FileRecord, ScanOptions, ScanResult};
