//! In-process store implementing the recording policy

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LeaderboardRow, PersistOutcome, PlayerRecord, ScoreStore, StoreError};

/// Players keyed by id, plus the currently signed-in player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    players: BTreeMap<String, PlayerRecord>,
    #[serde(default)]
    current: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign a player in, creating their record on first sign-in
    pub fn sign_in(&mut self, player_id: &str, display_name: &str) {
        self.players
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerRecord::new(player_id, display_name));
        self.current = Some(player_id.to_string());
        log::info!("Player signed in: {}", player_id);
    }

    pub fn sign_out(&mut self) {
        if let Some(id) = self.current.take() {
            log::info!("Player signed out: {}", id);
        }
    }

    pub fn current_player(&self) -> Option<&PlayerRecord> {
        self.current.as_ref().and_then(|id| self.players.get(id))
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerRecord> {
        self.players.get(player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Apply a finished run to the signed-in player's record
    pub fn record(&mut self, score: u64) -> PersistOutcome {
        let Some(record) = self
            .current
            .as_ref()
            .and_then(|id| self.players.get_mut(id))
        else {
            return PersistOutcome::NoPlayer;
        };

        record.attempts = record.attempts.saturating_add(1);
        let new_best = score > record.high_score;
        if new_best {
            record.high_score = score;
        }

        PersistOutcome::Recorded {
            attempts: record.attempts,
            high_score: record.high_score,
            new_best,
        }
    }

    /// Record a run, then hand the updated store to `commit`. A failed
    /// commit rolls the player's record back to what it was.
    pub fn record_and_commit<F>(
        &mut self,
        score: u64,
        commit: F,
    ) -> Result<PersistOutcome, StoreError>
    where
        F: FnOnce(&MemoryStore) -> Result<(), StoreError>,
    {
        let Some(id) = self.current.clone() else {
            return Ok(PersistOutcome::NoPlayer);
        };
        let Some(before) = self.players.get(&id).cloned() else {
            return Ok(PersistOutcome::NoPlayer);
        };

        let outcome = self.record(score);
        if let Err(e) = commit(self) {
            log::warn!("Rolling back run for {}: {}", id, e);
            self.players.insert(id, before);
            return Err(e);
        }
        Ok(outcome)
    }

    /// Leaderboard rows: high score descending, then fewer attempts, then name
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardRow> {
        let mut records: Vec<&PlayerRecord> = self.players.values().collect();
        records.sort_by(|a, b| {
            b.high_score
                .cmp(&a.high_score)
                .then(a.attempts.cmp(&b.attempts))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        records
            .into_iter()
            .take(limit)
            .map(|r| LeaderboardRow {
                name: r.display_name.clone(),
                attempts: r.attempts,
                score: r.high_score,
            })
            .collect()
    }
}

impl ScoreStore for MemoryStore {
    fn persist_score(&mut self, score: u64) -> Result<PersistOutcome, StoreError> {
        Ok(self.record(score))
    }

    fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardRow>, StoreError> {
        Ok(self.leaderboard(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_player_is_silent() {
        let mut store = MemoryStore::new();
        assert_eq!(store.persist_score(10), Ok(PersistOutcome::NoPlayer));
        assert!(store.is_empty());
    }

    #[test]
    fn test_attempts_and_high_score() {
        let mut store = MemoryStore::new();
        store.sign_in("p1", "Ada");

        assert_eq!(
            store.persist_score(7),
            Ok(PersistOutcome::Recorded {
                attempts: 1,
                high_score: 7,
                new_best: true
            })
        );
        assert_eq!(
            store.persist_score(3),
            Ok(PersistOutcome::Recorded {
                attempts: 2,
                high_score: 7,
                new_best: false
            })
        );
        // Equal score is not a new best
        assert_eq!(
            store.persist_score(7),
            Ok(PersistOutcome::Recorded {
                attempts: 3,
                high_score: 7,
                new_best: false
            })
        );
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let mut store = MemoryStore::new();
        store.sign_in("p1", "Ada");
        store.record(7);

        let failed = store.record_and_commit(30, |updated| {
            assert_eq!(updated.player("p1").map(|p| p.high_score), Some(30));
            Err(StoreError::Write("quota exceeded".to_string()))
        });
        assert_eq!(failed, Err(StoreError::Write("quota exceeded".to_string())));
        let record = store.player("p1").unwrap();
        assert_eq!(record.attempts, 1);
        assert_eq!(record.high_score, 7);

        let saved = store.record_and_commit(30, |_| Ok(()));
        assert_eq!(
            saved,
            Ok(PersistOutcome::Recorded {
                attempts: 2,
                high_score: 30,
                new_best: true
            })
        );

        store.sign_out();
        let mut called = false;
        assert_eq!(
            store.record_and_commit(5, |_| {
                called = true;
                Ok(())
            }),
            Ok(PersistOutcome::NoPlayer)
        );
        assert!(!called);
    }

    #[test]
    fn test_sign_in_keeps_existing_record() {
        let mut store = MemoryStore::new();
        store.sign_in("p1", "Ada");
        store.record(12);
        store.sign_out();
        assert_eq!(store.record(50), PersistOutcome::NoPlayer);

        store.sign_in("p1", "Renamed");
        let record = store.player("p1").cloned().unwrap();
        assert_eq!(record.display_name, "Ada");
        assert_eq!(record.attempts, 1);
        assert_eq!(record.high_score, 12);
    }

    #[test]
    fn test_leaderboard_order_and_limit() {
        let mut store = MemoryStore::new();
        for (id, name, scores) in [
            ("a", "Ann", vec![10]),
            ("b", "Bob", vec![30]),
            ("c", "Cid", vec![10, 2, 1]),
            ("d", "Dee", vec![10]),
            ("e", "Eve", vec![5]),
        ] {
            store.sign_in(id, name);
            for s in scores {
                store.record(s);
            }
        }

        let rows = store.fetch_top(4).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann", "Dee", "Cid"]);
        assert_eq!(rows[3].attempts, 3);
        assert_eq!(store.fetch_top(0).unwrap().len(), 0);
        assert_eq!(store.fetch_top(100).unwrap().len(), 5);
    }
}
