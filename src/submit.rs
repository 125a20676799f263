//! One-shot hand-off of the final score
//!
//! The latch is an atomic check-and-set shared through an `Arc`, so a clone
//! moved into a detached task still honors the single-submission guarantee
//! even if the view that spawned it is gone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::persistence::{PersistOutcome, ScoreStore};

/// What happened to a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store recorded the score
    Persisted(PersistOutcome),
    /// No signed-in player; nothing to do
    Skipped,
    /// The latch was already taken
    AlreadySubmitted,
    /// The store failed; gameplay is unaffected
    Failed(String),
}

impl SubmitOutcome {
    /// Message to surface as a non-blocking notice, if any
    pub fn notice(&self) -> Option<String> {
        match self {
            SubmitOutcome::Failed(msg) => Some(format!("Score could not be saved: {}", msg)),
            _ => None,
        }
    }
}

/// Per-session submission latch
#[derive(Debug, Clone, Default)]
pub struct ScoreSubmission {
    submitted: Arc<AtomicBool>,
}

impl ScoreSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latch. Only the first caller across all clones gets `true`.
    pub fn try_claim(&self) -> bool {
        self.submitted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.load(Ordering::Acquire)
    }

    /// Hand the final score to the store at most once
    pub fn submit_once(&self, final_score: u64, store: &mut dyn ScoreStore) -> SubmitOutcome {
        if !self.try_claim() {
            log::debug!("Score {} already submitted", final_score);
            return SubmitOutcome::AlreadySubmitted;
        }

        match store.persist_score(final_score) {
            Ok(PersistOutcome::NoPlayer) => {
                log::debug!("No player signed in, score {} not recorded", final_score);
                SubmitOutcome::Skipped
            }
            Ok(outcome) => {
                log::info!("Score {} recorded: {:?}", final_score, outcome);
                SubmitOutcome::Persisted(outcome)
            }
            Err(e) => {
                log::warn!("Failed to record score {}: {}", final_score, e);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}
