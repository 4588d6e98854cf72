use serde::{Deserialize, Serialize};

/// Main configuration structure for a scrape
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub selectors: SelectorConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub scrape: ScrapeConfig,
}

/// Search endpoint and URL construction
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Search results endpoint, without query string
    pub search_url: String,

    /// Query parameter carrying the search term
    pub term_param: String,

    /// Query parameter carrying the 1-based page number
    pub page_param: String,

    /// Prefix joined with a record id to form its detail-page link
    pub detail_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.jobkorea.co.kr/Search/".to_string(),
            term_param: "stext".to_string(),
            page_param: "Page_No".to_string(),
            detail_url: "https://www.jobkorea.co.kr/Recruit/GI_Read/".to_string(),
        }
    }
}

/// CSS selectors used against result pages
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Pagination container on the first result page
    pub pagination: String,

    /// Links inside the pagination container, one per page
    pub pagination_link: String,

    /// Listing cards on a result page
    pub card: String,

    /// Attribute on the card element holding the listing id
    pub id_attribute: String,

    /// Title text, relative to the card
    pub title: String,

    /// Location/company text, relative to the card
    pub location: String,

    /// Free-text tag field, relative to the card
    pub hashtag: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pagination: ".tplPagination.newVer.wide".to_string(),
            pagination_link: "a".to_string(),
            card: ".list-default .list-post".to_string(),
            id_attribute: "data-gno".to_string(),
            title: ".title".to_string(),
            location: ".name.dev_view".to_string(),
            hashtag: ".etc".to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("jobscrape/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the CSV file written at the end of a scrape
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "jobs.csv".to_string(),
        }
    }
}

/// Scrape behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrapeConfig {
    pub failure_mode: FailureMode,
}

/// How page and card failures affect the rest of a scrape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Record failed pages/cards and keep the successful ones
    #[default]
    Partial,

    /// First failure cancels every sibling task and aborts the scrape
    Strict,
}

impl FailureMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}
