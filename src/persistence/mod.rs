//! Player records and leaderboard storage
//!
//! The backend is a passive recorder: every submitted score counts as an
//! attempt, and the stored high score only ever rises. The simulation never
//! talks to storage directly; it goes through [`ScoreStore`].

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted shape of one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub display_name: String,
    pub attempts: u32,
    pub high_score: u64,
}

impl PlayerRecord {
    pub fn new(player_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            display_name: display_name.into(),
            attempts: 0,
            high_score: 0,
        }
    }
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub attempts: u32,
    pub score: u64,
}

/// Result of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Recorded {
        attempts: u32,
        high_score: u64,
        /// The run raised the stored high score
        new_best: bool,
    },
    /// Nobody is signed in; nothing was written
    NoPlayer,
}

/// Storage failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Records could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backing storage rejected the write
    #[error("write failed: {0}")]
    Write(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// The persistence collaborator the game hands final scores to
pub trait ScoreStore {
    /// Record a finished run for the signed-in player
    fn persist_score(&mut self, score: u64) -> Result<PersistOutcome, StoreError>;

    /// Top players by high score, best first
    fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardRow>, StoreError>;
}
