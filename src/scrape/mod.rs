//! Scrape module for fetching result pages and extracting job records
//!
//! This module contains the core scraping logic, including:
//! - Whitespace normalization of extracted text
//! - Listing-card extraction
//! - HTTP fetching and document parsing
//! - Page-count discovery
//! - Per-page card fan-out and the page-level coordinator

mod coordinator;
mod extract;
mod fetcher;
mod normalize;
mod page;
mod pagination;

pub use coordinator::{scrape, Scraper};
pub use extract::{extract_record, CardExtractor, CardSelectors, CardSnapshot, SelectorExtractor};
pub use fetcher::{build_http_client, fetch_body, fetch_parsed};
pub use normalize::normalize;
pub use page::{build_page_url, extract_cards, fetch_page, select_cards, PageBatch, PageContext};
pub use pagination::{count_pages, discover_page_count, PaginationSelectors};
