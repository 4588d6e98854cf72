//! Phase definitions for a single scrape invocation

use crate::ScrapeError;
use std::fmt;

/// Represents where a scrape currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapePhase {
    /// Nothing has been requested yet
    Idle,

    /// The first result page was fetched and the page total is known
    CountDiscovered { total_pages: u32 },

    /// Page tasks are running; `pending` batches have not been received
    Fetching { pending: u32 },

    /// Every batch arrived; records are being combined
    Merging,

    /// The merged records were handed to the result writer
    Written,

    /// The scrape finished successfully
    Done,

    /// The scrape aborted with a fatal error
    Failed,
}

impl ScrapePhase {
    /// Returns true once no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Checks whether moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: &ScrapePhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::CountDiscovered { .. }) => true,
            (Self::CountDiscovered { total_pages }, Self::Fetching { pending }) => {
                total_pages == pending
            }
            (Self::Fetching { pending: current }, Self::Fetching { pending: next }) => {
                *current > 0 && *next == current - 1
            }
            (Self::Fetching { pending: 0 }, Self::Merging) => true,
            (Self::Merging, Self::Written) => true,
            (Self::Written, Self::Done) => true,
            (current, Self::Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CountDiscovered { .. } => "count_discovered",
            Self::Fetching { .. } => "fetching",
            Self::Merging => "merging",
            Self::Written => "written",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ScrapePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountDiscovered { total_pages } => {
                write!(f, "{}({})", self.name(), total_pages)
            }
            Self::Fetching { pending } => write!(f, "{}(pending={})", self.name(), pending),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Enforces the phase ordering for one scrape
#[derive(Debug)]
pub struct PhaseTracker {
    phase: ScrapePhase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: ScrapePhase::Idle,
        }
    }

    pub fn phase(&self) -> ScrapePhase {
        self.phase
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn advance(&mut self, next: ScrapePhase) -> Result<(), ScrapeError> {
        if !self.phase.can_transition_to(&next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Scrape phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Consumes one pending slot while fetching, regardless of which page finished
    pub fn page_completed(&mut self) -> Result<(), ScrapeError> {
        match self.phase {
            ScrapePhase::Fetching { pending } if pending > 0 => {
                self.advance(ScrapePhase::Fetching {
                    pending: pending - 1,
                })
            }
            other => Err(ScrapeError::InvalidTransition {
                from: other,
                to: ScrapePhase::Fetching { pending: 0 },
            }),
        }
    }

    /// Marks the scrape failed unless it already finished
    pub fn fail(&mut self) {
        if !self.phase.is_terminal() {
            tracing::debug!("Scrape phase {} -> failed", self.phase);
            self.phase = ScrapePhase::Failed;
        }
    }
}
