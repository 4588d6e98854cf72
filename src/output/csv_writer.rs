//! CSV result writer
//!
//! Writes one header row (`LINK,TITLE,LOCATION,HASHTAG`) followed by one row
//! per record. The link column is the detail URL prefix joined with the id.

use crate::output::traits::{OutputResult, ResultWriter};
use crate::record::JobRecord;
use std::path::PathBuf;

/// Column headers, in output order
pub const CSV_HEADERS: [&str; 4] = ["LINK", "TITLE", "LOCATION", "HASHTAG"];

/// Writes records to a CSV file
#[derive(Debug, Clone)]
pub struct CsvResultWriter {
    path: PathBuf,
    detail_url: String,
}

impl CsvResultWriter {
    pub fn new(path: impl Into<PathBuf>, detail_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            detail_url: detail_url.into(),
        }
    }
}

impl ResultWriter for CsvResultWriter {
    fn write_records(&self, records: &[JobRecord]) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        writer.write_record(CSV_HEADERS)?;
        for record in records {
            let link = record.link(&self.detail_url);
            writer.write_record([
                link.as_str(),
                record.title.as_str(),
                record.location.as_str(),
                record.hashtag.as_str(),
            ])?;
        }

        writer.flush()?;
        tracing::debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(())
    }

    fn destination(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}
