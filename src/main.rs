//! Jobscrape main entry point
//!
//! Command-line interface for the concurrent job-listing scraper.

use clap::Parser;
use jobscrape::config::{config_fingerprint, load_config, validate, Config, FailureMode};
use jobscrape::output::print_report;
use jobscrape::scrape::Scraper;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Jobscrape: scrape job listings for a search term into CSV
///
/// Discovers how many result pages the term produces, fetches them all
/// concurrently, and writes one row per listing.
#[derive(Parser, Debug)]
#[command(name = "jobscrape")]
#[command(version)]
#[command(about = "Scrape job listings for a search term into CSV", long_about = None)]
struct Cli {
    /// Search term
    #[arg(value_name = "TERM")]
    term: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// CSV output path (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Abort on the first page or card failure
    #[arg(long)]
    strict: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if cli.strict {
        config.scrape.failure_mode = FailureMode::Strict;
    }
    validate(&config)?;
    tracing::info!("Effective configuration hash: {}", config_fingerprint(&config)?);

    tracing::info!(
        "Scraping '{}' ({:?} mode) into {}",
        cli.term,
        config.scrape.failure_mode,
        config.output.csv_path
    );

    let scraper = Scraper::new(config)?;
    let report = scraper.scrape(&cli.term).await?;

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobscrape=info,warn"),
            1 => EnvFilter::new("jobscrape=debug,info"),
            2 => EnvFilter::new("jobscrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
