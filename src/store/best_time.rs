use log::{info, warn};

use super::{KeyValueStore, StoreError};
use crate::models::Difficulty;

pub const BEST_TIME_KEY_PREFIX: &str = "bestTime_";

pub fn best_time_key(difficulty: Difficulty) -> String {
    format!("{BEST_TIME_KEY_PREFIX}{}", difficulty.as_str())
}

/// Fastest completion time per difficulty, in whole seconds.
pub struct BestTimes<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BestTimes<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_best(&self, difficulty: Difficulty) -> Option<u64> {
        let key = best_time_key(difficulty);
        let raw = self.store.get(&key)?;
        match raw.trim().parse::<u64>() {
            Ok(seconds) => Some(seconds),
            Err(_) => {
                warn!("Ignoring unparsable {key} value {raw:?}");
                None
            }
        }
    }

    /// Stores `seconds` if it beats the current record. Ties are not records.
    pub fn record_if_better(
        &mut self,
        difficulty: Difficulty,
        seconds: u64,
    ) -> Result<bool, StoreError> {
        if let Some(best) = self.get_best(difficulty)
            && seconds >= best
        {
            return Ok(false);
        }

        self.store
            .set(&best_time_key(difficulty), &seconds.to_string())?;
        info!("New best time for {difficulty}: {seconds}s");
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
