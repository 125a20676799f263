//! LocalStorage-backed store (WASM only)
//!
//! Keeps a [`MemoryStore`] in memory and writes the whole snapshot back as
//! JSON after every recorded run. A run whose write fails is rolled back so
//! memory never runs ahead of storage.

use super::{LeaderboardRow, MemoryStore, PersistOutcome, ScoreStore, StoreError};
use crate::platform;

pub struct LocalStorageStore {
    inner: MemoryStore,
}

impl LocalStorageStore {
    /// LocalStorage key for the player snapshot
    const STORAGE_KEY: &'static str = "zipzap_players";

    /// Load the snapshot, starting fresh if there is none or it is unreadable
    pub fn load() -> Self {
        if let Some(storage) = platform::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<MemoryStore>(&json) {
                    Ok(inner) => {
                        log::info!("Loaded {} player records", inner.len());
                        return Self { inner };
                    }
                    Err(e) => log::warn!("Discarding unreadable player records: {}", e),
                }
            }
        }

        log::info!("No player records found, starting fresh");
        Self {
            inner: MemoryStore::new(),
        }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        Self::write(&self.inner)
    }

    fn write(snapshot: &MemoryStore) -> Result<(), StoreError> {
        let storage = platform::storage()
            .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))?;
        let json = serde_json::to_string(snapshot)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))?;
        log::info!("Player records saved ({} players)", snapshot.len());
        Ok(())
    }

    pub fn sign_in(&mut self, player_id: &str, display_name: &str) -> Result<(), StoreError> {
        self.inner.sign_in(player_id, display_name);
        self.save()
    }

    pub fn sign_out(&mut self) -> Result<(), StoreError> {
        self.inner.sign_out();
        self.save()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl ScoreStore for LocalStorageStore {
    fn persist_score(&mut self, score: u64) -> Result<PersistOutcome, StoreError> {
        self.inner.record_and_commit(score, Self::write)
    }

    fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardRow>, StoreError> {
        Ok(self.inner.leaderboard(limit))
    }
}
