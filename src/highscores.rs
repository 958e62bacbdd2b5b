//! Best-score leaderboard
//!
//! Persisted to LocalStorage as a plain JSON array of integers, descending,
//! at most 5 entries. Missing or corrupt storage degrades to an empty list;
//! nothing here can fail the game.

/// Maximum number of best scores to keep
pub const MAX_BEST_SCORES: usize = 5;

/// Top-5 leaderboard, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestScores {
    pub scores: Vec<u32>,
}

impl BestScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_dash_best_scores";

    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Insert a score, keeping the list sorted descending and at most
    /// [`MAX_BEST_SCORES`] long. Duplicates are kept when they fit; a score
    /// below a full board's last entry falls off the end.
    pub fn push(&mut self, value: u32) {
        self.scores.push(value);
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(MAX_BEST_SCORES);
    }

    /// The top score, or 0 for an empty board
    pub fn best(&self) -> u32 {
        self.scores.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Decode the persisted array. Anything that is not a JSON array of
    /// integers degrades to an empty board; extra entries are dropped.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<u32>>(json) {
            Ok(mut scores) => {
                scores.truncate(MAX_BEST_SCORES);
                Self { scores }
            }
            Err(_) => Self::new(),
        }
    }

    /// Encode the board as the persisted plain-array form
    pub fn to_json(&self) -> String {
        let top = &self.scores[..self.scores.len().min(MAX_BEST_SCORES)];
        serde_json::to_string(top).unwrap_or_else(|_| "[]".to_string())
    }

    /// Load best scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} best scores", scores.scores.len());
                return scores;
            }
        }

        log::info!("No best scores found, starting fresh");
        Self::new()
    }

    /// Save best scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Best scores saved ({} entries)", self.scores.len());
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_keeps_descending_order() {
        let mut best = BestScores::new();
        for v in [30, 50, 10, 40, 20] {
            best.push(v);
        }
        assert_eq!(best.scores, vec![50, 40, 30, 20, 10]);
        assert_eq!(best.best(), 50);
    }

    #[test]
    fn board_truncates_to_five() {
        let mut best = BestScores::new();
        for v in [10, 20, 30, 40, 50, 60, 70] {
            best.push(v);
        }
        assert_eq!(best.scores, vec![70, 60, 50, 40, 30]);
    }

    #[test]
    fn duplicates_are_kept_when_they_fit() {
        let mut best = BestScores::new();
        best.push(25);
        best.push(25);
        assert_eq!(best.scores, vec![25, 25]);
    }

    #[test]
    fn low_score_falls_off_a_full_board() {
        let mut best = BestScores {
            scores: vec![50, 40, 30, 20, 10],
        };
        best.push(5);
        assert_eq!(best.scores, vec![50, 40, 30, 20, 10]);

        best.push(35);
        assert_eq!(best.scores, vec![50, 40, 35, 30, 20]);
    }

    #[test]
    fn json_round_trip_preserves_the_board() {
        let best = BestScores {
            scores: vec![50, 40, 30, 20, 10],
        };
        let json = best.to_json();
        assert_eq!(json, "[50,40,30,20,10]");
        assert_eq!(BestScores::from_json(&json), best);
    }

    #[test]
    fn corrupt_storage_degrades_to_empty() {
        assert!(BestScores::from_json("not json").is_empty());
        assert!(BestScores::from_json("{\"scores\":[1,2]}").is_empty());
        assert!(BestScores::from_json("42").is_empty());
        assert!(BestScores::from_json("[1, \"two\"]").is_empty());
    }

    #[test]
    fn oversized_stored_array_is_trimmed_on_load() {
        let loaded = BestScores::from_json("[9,8,7,6,5,4,3]");
        assert_eq!(loaded.scores, vec![9, 8, 7, 6, 5]);
    }

    proptest! {
        #[test]
        fn board_invariants_hold_under_any_pushes(
            values in proptest::collection::vec(0u32..100_000, 0..32)
        ) {
            let mut best = BestScores::new();
            for v in values {
                best.push(v);
                prop_assert!(best.scores.len() <= MAX_BEST_SCORES);
                prop_assert!(best.scores.windows(2).all(|w| w[0] >= w[1]));
            }
        }

        #[test]
        fn pushed_value_lands_unless_it_misses_a_full_board(
            existing in proptest::collection::vec(0u32..1000, 0..=5),
            value in 0u32..1000,
        ) {
            let mut best = BestScores::new();
            for v in existing {
                best.push(v);
            }
            let was_full = best.scores.len() == MAX_BEST_SCORES;
            let cutoff = best.scores.last().copied().unwrap_or(0);
            best.push(value);
            if !(was_full && value < cutoff) {
                prop_assert!(best.scores.contains(&value));
            } else {
                prop_assert_eq!(best.scores.len(), MAX_BEST_SCORES);
            }
        }
    }
}
