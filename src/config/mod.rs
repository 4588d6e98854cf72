//! Configuration module
//!
//! Handles loading, parsing, and validating TOML configuration files. Every
//! section is optional; an empty file yields the built-in site defaults.
//!
//! # Example
//!
//! ```no_run
//! use jobscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jobscrape.toml")).unwrap();
//! println!("Searching {}", config.site.search_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FailureMode, HttpConfig, OutputConfig, ScrapeConfig, SelectorConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config};
pub use validation::validate;
