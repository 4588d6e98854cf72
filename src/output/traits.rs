//! Result writer trait and scrape report types

use crate::record::JobRecord;
use crate::OutputError;
use std::path::PathBuf;
use std::time::Duration;

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A result page that produced no batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Page number, unknown when the task itself panicked
    pub page: Option<u32>,

    /// Error message
    pub error: String,
}

/// A listing card that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    /// Page the card belonged to, unknown when the task panicked
    pub page_url: Option<String>,

    /// Position of the card on its page
    pub index: Option<usize>,

    /// Error message
    pub error: String,
}

/// Outcome of a completed scrape
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Search term the scrape ran for
    pub term: String,

    /// Page total discovered from the first result page
    pub total_pages: u32,

    /// Merged records from every successful page, in arrival order
    pub records: Vec<JobRecord>,

    /// Pages that failed (partial mode only)
    pub failed_pages: Vec<PageFailure>,

    /// Cards that failed (partial mode only)
    pub failed_cards: Vec<CardFailure>,

    /// Where the records were written
    pub output: Option<PathBuf>,

    /// Wall-clock time from start to write
    pub elapsed: Duration,
}

impl ScrapeReport {
    /// Number of pages that returned a batch
    pub fn pages_succeeded(&self) -> u32 {
        self.total_pages
            .saturating_sub(self.failed_pages.len() as u32)
    }

    /// True when no page or card failed
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && self.failed_cards.is_empty()
    }
}

/// Persists the merged records of a scrape
///
/// Called once per scrape, from the coordinating task only.
pub trait ResultWriter: Send + Sync {
    /// Writes all records, replacing any previous output
    fn write_records(&self, records: &[JobRecord]) -> OutputResult<()>;

    /// Location of the written output, if it has one
    fn destination(&self) -> Option<PathBuf> {
        None
    }
}
