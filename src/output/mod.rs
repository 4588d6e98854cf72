//! Output module for persisting and reporting scrape results
//!
//! This module handles:
//! - Writing merged job records as CSV
//! - Describing the outcome of a scrape (counts, failures, timing)

mod csv_writer;
pub mod stats;
mod traits;

pub use csv_writer::{CsvResultWriter, CSV_HEADERS};
pub use stats::{format_report, print_report};
pub use traits::{CardFailure, OutputResult, PageFailure, ResultWriter, ScrapeReport};
