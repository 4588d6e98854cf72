//! Page-count discovery from the first result page

use crate::config::SelectorConfig;
use crate::scrape::extract::compile;
use crate::scrape::fetcher::fetch_parsed;
use crate::{ConfigError, ScrapeError};
use reqwest::Client;
use scraper::{Html, Selector};

/// Compiled selectors for the pagination container and its links
#[derive(Debug, Clone)]
pub struct PaginationSelectors {
    pub container: Selector,
    pub link: Selector,
}

impl PaginationSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            container: compile(&config.pagination)?,
            link: compile(&config.pagination_link)?,
        })
    }
}

/// Counts the page links in the pagination container of `document`
///
/// When several containers match, the last one in document order decides.
/// A document without a container has zero pages.
pub fn count_pages(document: &Html, selectors: &PaginationSelectors) -> u32 {
    document
        .select(&selectors.container)
        .last()
        .map(|container| container.select(&selectors.link).count() as u32)
        .unwrap_or(0)
}

/// Fetches `base_url` once and returns how many result pages it advertises
///
/// # Returns
///
/// * `Ok(0)` - No pagination container; nothing to fetch
/// * `Ok(n)` - Number of page links found
/// * `Err(ScrapeError)` - Fetch or parse failure
pub async fn discover_page_count(
    client: &Client,
    base_url: &str,
    selectors: &PaginationSelectors,
) -> Result<u32, ScrapeError> {
    tracing::info!("Discovering page count from {}", base_url);
    let selectors = selectors.clone();
    let pages = fetch_parsed(client, base_url, move |document| {
        count_pages(document, &selectors)
    })
    .await?;
    tracing::info!("Found {} result pages", pages);
    Ok(pages)
}
