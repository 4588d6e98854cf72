use crate::config::types::{Config, HttpConfig, OutputConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_selector_config(&config.selectors)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search endpoint and query parameter names
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("search-url", &config.search_url)?;
    validate_http_url("detail-url", &config.detail_url)?;

    if config.term_param.is_empty() {
        return Err(ConfigError::Validation(
            "term-param cannot be empty".to_string(),
        ));
    }

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    if config.term_param == config.page_param {
        return Err(ConfigError::Validation(format!(
            "term-param and page-param must differ, both are '{}'",
            config.term_param
        )));
    }

    Ok(())
}

/// Checks that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("pagination", &config.pagination),
        ("pagination-link", &config.pagination_link),
        ("card", &config.card),
        ("title", &config.title),
        ("location", &config.location),
        ("hashtag", &config.hashtag),
    ] {
        validate_selector(name, selector)?;
    }

    if config.id_attribute.is_empty() {
        return Err(ConfigError::Validation(
            "id-attribute cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout-secs={} connect-timeout-secs={}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Parses a URL and requires an http(s) scheme
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", name, selector, e)))
}
