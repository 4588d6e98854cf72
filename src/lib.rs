//! Jobscrape: a concurrent job-listing scraper
//!
//! This crate discovers how many result pages a search term produces, fetches
//! every page concurrently, extracts a structured record from each listing card
//! (also concurrently), and writes the merged records to a CSV file.

pub mod config;
pub mod output;
pub mod record;
pub mod scrape;
pub mod state;

use thiserror::Error;

/// Main error type for scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Request failed for {url} with status {status}")]
    Status { url: String, status: u16 },

    #[error("Document parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Write error: {0}")]
    Write(#[from] OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Worker task failed: {0}")]
    Task(String),

    #[error("Scrape cancelled")]
    Cancelled,

    #[error("All {pages} result pages failed")]
    AllPagesFailed { pages: u32 },

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::ScrapePhase,
        to: state::ScrapePhase,
    },
}

/// Closed classification of [`ScrapeError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or non-success status code
    Fetch,
    /// Response body could not be interpreted as a document
    Parse,
    /// Output artifact could not be created or written
    Write,
    /// Anything else (configuration, cancellation, internal task failure)
    Other,
}

impl ScrapeError {
    /// Returns the taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { .. } | Self::Status { .. } => ErrorKind::Fetch,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Write(_) => ErrorKind::Write,
            _ => ErrorKind::Other,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Errors raised while persisting scrape results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, FailureMode};
pub use output::{CsvResultWriter, ResultWriter, ScrapeReport};
pub use record::JobRecord;
pub use scrape::{scrape, Scraper};
pub use state::ScrapePhase;
