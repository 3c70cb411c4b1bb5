use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid age '{0}': use <number><unit> (e.g. 30d, 6m, 1y)")]
    InvalidAge(String),

    #[error("invalid size '{0}': use <number><unit> (e.g. 100MB, 1.5GB)")]
    InvalidSize(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{0}")]
    Other(String),
}
