//! Console reporting for finished scrapes

use crate::output::traits::ScrapeReport;
use std::fmt::Write;

/// Formats a scrape report as plain text
pub fn format_report(report: &ScrapeReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Scrape Report ===\n");
    let _ = writeln!(out, "Term: {}", report.term);
    let _ = writeln!(
        out,
        "Pages: {} / {} succeeded",
        report.pages_succeeded(),
        report.total_pages
    );
    let _ = writeln!(out, "Done, extracted {}", report.records.len());
    let _ = writeln!(out, "Time: {:.2?}", report.elapsed);
    if let Some(path) = &report.output {
        let _ = writeln!(out, "Output: {}", path.display());
    }

    if !report.failed_pages.is_empty() {
        let _ = writeln!(out, "\nFailed Pages ({}):", report.failed_pages.len());
        for failure in &report.failed_pages {
            match failure.page {
                Some(page) => {
                    let _ = writeln!(out, "  - page {}: {}", page, failure.error);
                }
                None => {
                    let _ = writeln!(out, "  - unknown page: {}", failure.error);
                }
            }
        }
    }

    if !report.failed_cards.is_empty() {
        let _ = writeln!(out, "\nFailed Cards ({}):", report.failed_cards.len());
        for failure in &report.failed_cards {
            let _ = writeln!(
                out,
                "  - {} #{}: {}",
                failure.page_url.as_deref().unwrap_or("?"),
                failure
                    .index
                    .map(|i| i.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                failure.error
            );
        }
    }

    out
}

/// Prints a scrape report to stdout
pub fn print_report(report: &ScrapeReport) {
    print!("{}", format_report(report));
}
