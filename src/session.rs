//! Frame-loop driver for one play session
//!
//! Owns the game state, the scheduling flag and the submission latch. The
//! front-end calls [`Session::frame`] once per display callback and stops
//! scheduling when it reports anything other than `Continue`.

use crate::persistence::ScoreStore;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::tick::{TickOutcome, tick};
use crate::submit::{ScoreSubmission, SubmitOutcome};
use crate::tuning::Tuning;

/// Result of one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame
    Continue,
    /// The run ended this frame; reported once per session
    Ended { final_score: u64 },
    /// Nothing ran (stopped or already over)
    Idle,
}

pub struct Session {
    state: GameState,
    submission: ScoreSubmission,
    running: bool,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("Starting session with seed: {}", seed);
        Self::from_state(GameState::new(seed, tuning))
    }

    pub fn from_state(state: GameState) -> Self {
        let running = state.phase == GamePhase::Playing;
        Self {
            state,
            submission: ScoreSubmission::new(),
            running,
        }
    }

    /// Run one frame if scheduling is active
    pub fn frame(&mut self) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Idle;
        }
        match tick(&mut self.state) {
            TickOutcome::Continue => FrameOutcome::Continue,
            TickOutcome::GameOver { final_score } => {
                self.running = false;
                FrameOutcome::Ended { final_score }
            }
            TickOutcome::Idle => {
                self.running = false;
                FrameOutcome::Idle
            }
        }
    }

    /// Player flip input. Ignored unless playing.
    pub fn flip(&mut self) -> bool {
        self.state.flip()
    }

    /// Start a new run. Only honored from GameOver; arms a fresh latch and
    /// resumes scheduling.
    pub fn restart(&mut self) -> bool {
        if !self.state.restart() {
            return false;
        }
        self.submission = ScoreSubmission::new();
        self.running = true;
        true
    }

    /// Cancel scheduling (teardown)
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Session stopped at frame {}", self.state.frame);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Handle to this run's latch, for detached submission tasks
    pub fn submission(&self) -> ScoreSubmission {
        self.submission.clone()
    }

    /// Submit the frozen score. `None` while the run is still going.
    pub fn submit_final(&self, store: &mut dyn ScoreStore) -> Option<SubmitOutcome> {
        if !self.is_over() {
            return None;
        }
        Some(self.submission.submit_once(self.state.score, store))
    }
}
