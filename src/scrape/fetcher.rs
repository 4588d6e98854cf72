//! HTTP fetcher
//!
//! Builds the shared client and turns a GET response into a parsed document,
//! classifying failures as fetch errors (transport, non-2xx status) or parse
//! errors (a body that is not a markup document).

use crate::config::HttpConfig;
use crate::ScrapeError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client from the configuration
///
/// # Example
///
/// ```no_run
/// use jobscrape::config::HttpConfig;
/// use jobscrape::scrape::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches `url` and returns the response body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection/timeout/body read failure | `Fetch` |
/// | Status outside 2xx | `Status` |
/// | Declared Content-Type is not HTML or XML | `Parse` |
pub async fn fetch_body(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let response = client.get(url).send().await.map_err(|e| ScrapeError::Fetch {
        url: url.to_string(),
        reason: classify_transport_error(&e),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = &content_type {
        if !is_markup(content_type) {
            return Err(ScrapeError::Parse {
                url: url.to_string(),
                message: format!("expected an HTML document, got {}", content_type),
            });
        }
    }

    response.text().await.map_err(|e| ScrapeError::Fetch {
        url: url.to_string(),
        reason: format!("failed to read body: {}", e),
    })
}

/// Fetches `url`, parses it on the blocking pool and runs `read` on the document
///
/// The parsed document never leaves the blocking task, so only what `read`
/// returns crosses back to the caller.
pub async fn fetch_parsed<T, F>(client: &Client, url: &str, read: F) -> Result<T, ScrapeError>
where
    F: FnOnce(&Html) -> T + Send + 'static,
    T: Send + 'static,
{
    let body = fetch_body(client, url).await?;
    tokio::task::spawn_blocking(move || read(&Html::parse_document(&body)))
        .await
        .map_err(|e| ScrapeError::Task(e.to_string()))
}

fn is_markup(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("html") || content_type.contains("xml")
}

fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        format!("redirect error: {}", error)
    } else {
        error.to_string()
    }
}
