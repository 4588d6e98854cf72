//! State module for tracking scrape progress
//!
//! A single scrape walks `Idle → CountDiscovered → Fetching → Merging →
//! Written → Done`. `Fetching` carries the number of page batches still
//! outstanding and only yields to `Merging` once that reaches zero.

mod scrape_phase;

pub use scrape_phase::{PhaseTracker, ScrapePhase};
