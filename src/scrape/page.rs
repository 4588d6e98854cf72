//! Result-page fetching and per-card fan-out
//!
//! A page task fetches its document, snapshots every listing card, then runs
//! one extraction task per card and waits for exactly that many results.

use crate::config::{FailureMode, SelectorConfig};
use crate::output::CardFailure;
use crate::record::JobRecord;
use crate::scrape::extract::{compile, CardExtractor, CardSnapshot};
use crate::scrape::fetcher::fetch_parsed;
use crate::{ConfigError, ScrapeError};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything a page task needs, shared between all page tasks of a scrape
#[derive(Debug)]
pub struct PageContext<E: CardExtractor> {
    pub client: Client,
    pub card_selector: Selector,
    pub page_param: String,
    pub failure_mode: FailureMode,
    pub extractor: Arc<E>,
}

impl<E: CardExtractor> PageContext<E> {
    pub fn new(
        client: Client,
        selectors: &SelectorConfig,
        page_param: impl Into<String>,
        failure_mode: FailureMode,
        extractor: E,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            card_selector: compile(&selectors.card)?,
            page_param: page_param.into(),
            failure_mode,
            extractor: Arc::new(extractor),
        })
    }
}

/// Records extracted from one result page
#[derive(Debug, Clone, Default)]
pub struct PageBatch {
    /// 1-based page number
    pub page: u32,

    /// URL the page was fetched from
    pub url: String,

    /// Records from every card that extracted successfully
    pub records: Vec<JobRecord>,

    /// Cards that failed (partial mode only)
    pub failed_cards: Vec<CardFailure>,
}

/// Appends the page-number parameter to the search URL
pub fn build_page_url(base_url: &Url, page_param: &str, page: u32) -> Url {
    let mut url = base_url.clone();
    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());
    url
}

/// Snapshots every card matched by `card_selector` in document order
pub fn select_cards(document: &Html, card_selector: &Selector, page_url: &str) -> Vec<CardSnapshot> {
    document
        .select(card_selector)
        .enumerate()
        .map(|(index, element)| CardSnapshot::from_element(index, page_url, element))
        .collect()
}

/// Fetches one result page and extracts all of its cards
///
/// # Errors
///
/// Fetch and parse failures for the page itself are always returned. A card
/// failure is returned only in strict mode; in partial mode it is recorded in
/// the batch.
pub async fn fetch_page<E: CardExtractor>(
    ctx: &PageContext<E>,
    page: u32,
    base_url: &Url,
    cancel: &CancellationToken,
) -> Result<PageBatch, ScrapeError> {
    let page_url = build_page_url(base_url, &ctx.page_param, page);
    tracing::info!("Requesting {}", page_url);

    let card_selector = ctx.card_selector.clone();
    let snapshot_url = page_url.to_string();
    let cards = fetch_parsed(&ctx.client, page_url.as_str(), move |document| {
        select_cards(document, &card_selector, &snapshot_url)
    })
    .await?;
    tracing::debug!("Page {} has {} cards", page, cards.len());

    let (records, failed_cards) =
        extract_cards(Arc::clone(&ctx.extractor), cards, ctx.failure_mode, cancel).await?;

    Ok(PageBatch {
        page,
        url: page_url.to_string(),
        records,
        failed_cards,
    })
}

/// Runs `extractor` over every card concurrently and collects all results
///
/// Completion order is unspecified; the returned records follow it. Exactly
/// one result is received per card unless `cancel` fires, in which case the
/// remaining tasks are aborted and `Cancelled` is returned.
pub async fn extract_cards<E: CardExtractor>(
    extractor: Arc<E>,
    cards: Vec<CardSnapshot>,
    failure_mode: FailureMode,
    cancel: &CancellationToken,
) -> Result<(Vec<JobRecord>, Vec<CardFailure>), ScrapeError> {
    let expected = cards.len();
    let mut join_set = JoinSet::new();

    for card in cards {
        let extractor = Arc::clone(&extractor);
        join_set.spawn_blocking(move || {
            let result = extractor.extract(&card);
            (card, result)
        });
    }

    let mut records = Vec::with_capacity(expected);
    let mut failed_cards = Vec::new();

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                abort_and_drain(&mut join_set).await;
                return Err(ScrapeError::Cancelled);
            }
            joined = join_set.join_next() => joined,
        };

        let Some(joined) = joined else {
            break;
        };

        let failure = match joined {
            Ok((_, Ok(record))) => {
                records.push(record);
                continue;
            }
            Ok((card, Err(error))) => (Some(card), error),
            Err(join_error) => (None, ScrapeError::Task(join_error.to_string())),
        };

        match failure {
            (_, error) if failure_mode.is_strict() => {
                abort_and_drain(&mut join_set).await;
                return Err(error);
            }
            (card, error) => {
                tracing::warn!("Card extraction failed: {}", error);
                failed_cards.push(CardFailure {
                    page_url: card.as_ref().map(|c| c.page_url.clone()),
                    index: card.as_ref().map(|c| c.index),
                    error: error.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        "Collected {} of {} cards ({} failed)",
        records.len(),
        expected,
        failed_cards.len()
    );
    Ok((records, failed_cards))
}

/// Aborts every task in `join_set` and waits until all of them resolved
pub(crate) async fn abort_and_drain<T: 'static>(join_set: &mut JoinSet<T>) {
    join_set.abort_all();
    while join_set.join_next().await.is_some() {}
}
