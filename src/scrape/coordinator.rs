//! Scrape coordinator - main orchestration logic
//!
//! This module drives a whole scrape:
//! - Building the search URL for a term
//! - Discovering the page total from the first result page
//! - Fanning out one task per page and fanning their batches back in
//! - Merging batches and handing them to the result writer
//!
//! In strict mode the first failure cancels every sibling page task; in
//! partial mode failures are collected into the report.

use crate::config::{Config, FailureMode};
use crate::output::{CardFailure, CsvResultWriter, PageFailure, ResultWriter, ScrapeReport};
use crate::record::JobRecord;
use crate::scrape::extract::{CardExtractor, SelectorExtractor};
use crate::scrape::fetcher::build_http_client;
use crate::scrape::page::{abort_and_drain, fetch_page, PageBatch, PageContext};
use crate::scrape::pagination::{discover_page_count, PaginationSelectors};
use crate::state::{PhaseTracker, ScrapePhase};
use crate::ScrapeError;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main scrape coordinator
pub struct Scraper<E: CardExtractor = SelectorExtractor> {
    config: Arc<Config>,
    pagination: PaginationSelectors,
    pages: Arc<PageContext<E>>,
    writer: Arc<dyn ResultWriter>,
}

impl Scraper<SelectorExtractor> {
    /// Creates a coordinator that writes CSV to `config.output.csv_path`
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to scrape
    /// * `Err(ScrapeError)` - Invalid selectors or HTTP client setup failed
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let extractor = SelectorExtractor::from_config(&config.selectors)?;
        Self::with_extractor(config, extractor)
    }
}

impl<E: CardExtractor> Scraper<E> {
    /// Creates a coordinator with a custom card extractor
    pub fn with_extractor(config: Config, extractor: E) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config.http)?;
        let pagination = PaginationSelectors::from_config(&config.selectors)?;
        let pages = PageContext::new(
            client,
            &config.selectors,
            config.site.page_param.clone(),
            config.scrape.failure_mode,
            extractor,
        )?;
        let writer = CsvResultWriter::new(&config.output.csv_path, config.site.detail_url.clone());

        Ok(Self {
            config: Arc::new(config),
            pagination,
            pages: Arc::new(pages),
            writer: Arc::new(writer),
        })
    }

    /// Replaces the result writer
    pub fn with_writer(mut self, writer: impl ResultWriter + 'static) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.pages.failure_mode
    }

    /// Builds the search URL for `term`, encoding it as a query parameter
    pub fn search_url(&self, term: &str) -> Result<Url, ScrapeError> {
        let site = &self.config.site;
        Ok(Url::parse_with_params(
            &site.search_url,
            &[(site.term_param.as_str(), term)],
        )?)
    }

    /// Runs a complete scrape for `term`
    ///
    /// 1. Fetch the first result page and count its pagination links
    /// 2. Spawn one task per page, 1..=total
    /// 3. Receive exactly `total` results, in any order
    /// 4. Merge all records and write them
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - Records written; any partial failures listed
    /// * `Err(ScrapeError)` - Discovery failed, every page failed, the write
    ///   failed, or (strict mode) any page or card failed
    pub async fn scrape(&self, term: &str) -> Result<ScrapeReport, ScrapeError> {
        let start = Instant::now();
        let mut phases = PhaseTracker::new();

        match self.run(term, &mut phases, start).await {
            Ok(report) => {
                tracing::info!(
                    "Done, extracted {} records from {} pages in {:.2?}",
                    report.records.len(),
                    report.pages_succeeded(),
                    report.elapsed
                );
                Ok(report)
            }
            Err(e) => {
                phases.fail();
                tracing::error!("Scrape for '{}' failed: {}", term, e);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        term: &str,
        phases: &mut PhaseTracker,
        start: Instant,
    ) -> Result<ScrapeReport, ScrapeError> {
        let base_url = self.search_url(term)?;

        let total_pages =
            discover_page_count(&self.pages.client, base_url.as_str(), &self.pagination).await?;
        phases.advance(ScrapePhase::CountDiscovered { total_pages })?;

        let (batches, failed_pages) = self.fetch_all_pages(&base_url, total_pages, phases).await?;

        if total_pages > 0 && batches.is_empty() {
            return Err(ScrapeError::AllPagesFailed { pages: total_pages });
        }

        phases.advance(ScrapePhase::Merging)?;
        let mut records = Vec::new();
        let mut failed_cards: Vec<CardFailure> = Vec::new();
        for batch in batches {
            records.extend(batch.records);
            failed_cards.extend(batch.failed_cards);
        }

        let records = self.write(records).await?;
        phases.advance(ScrapePhase::Written)?;
        phases.advance(ScrapePhase::Done)?;

        Ok(ScrapeReport {
            term: term.to_string(),
            total_pages,
            records,
            failed_pages,
            failed_cards,
            output: self.writer.destination(),
            elapsed: start.elapsed(),
        })
    }

    /// Hands the merged records to the writer on the blocking pool
    async fn write(&self, records: Vec<JobRecord>) -> Result<Vec<JobRecord>, ScrapeError> {
        let writer = Arc::clone(&self.writer);
        let (records, written) = tokio::task::spawn_blocking(move || {
            let written = writer.write_records(&records);
            (records, written)
        })
        .await
        .map_err(|e| ScrapeError::Task(e.to_string()))?;

        written?;
        Ok(records)
    }

    /// Fans out one task per page and collects exactly `total_pages` results
    async fn fetch_all_pages(
        &self,
        base_url: &Url,
        total_pages: u32,
        phases: &mut PhaseTracker,
    ) -> Result<(Vec<PageBatch>, Vec<PageFailure>), ScrapeError> {
        phases.advance(ScrapePhase::Fetching {
            pending: total_pages,
        })?;

        let cancel = CancellationToken::new();
        let mut join_set = JoinSet::new();

        for page in 1..=total_pages {
            let pages = Arc::clone(&self.pages);
            let base_url = base_url.clone();
            let cancel = cancel.clone();

            join_set.spawn(async move {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
                    result = fetch_page(&pages, page, &base_url, &cancel) => result,
                };
                (page, result)
            });
        }

        let mut batches = Vec::with_capacity(total_pages as usize);
        let mut failed_pages = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            phases.page_completed()?;

            let (page, error) = match joined {
                Ok((_, Ok(batch))) => {
                    tracing::debug!(
                        "Page {} returned {} records",
                        batch.page,
                        batch.records.len()
                    );
                    batches.push(batch);
                    continue;
                }
                Ok((page, Err(error))) => (Some(page), error),
                Err(join_error) => (None, ScrapeError::Task(join_error.to_string())),
            };

            if self.failure_mode().is_strict() {
                tracing::warn!("Page {:?} failed, cancelling remaining pages", page);
                cancel.cancel();
                abort_and_drain(&mut join_set).await;
                return Err(error);
            }

            tracing::warn!("Page {:?} failed: {}", page, error);
            failed_pages.push(PageFailure {
                page,
                error: error.to_string(),
            });
        }

        Ok((batches, failed_pages))
    }
}

/// Runs a complete scrape with the default CSS extractor and CSV writer
///
/// # Example
///
/// ```no_run
/// use jobscrape::config::Config;
/// use jobscrape::scrape::scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = scrape("rust", Config::default()).await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(term: &str, config: Config) -> Result<ScrapeReport, ScrapeError> {
    Scraper::new(config)?.scrape(term).await
}
