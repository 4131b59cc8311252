// Recommendation: neighborhood aggregation and top-N ranking.

pub mod neighborhood;
pub mod traits;

use serde::Serialize;

use crate::similarity::Mode;

/// One ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item: u32,
    pub score: f64,
}

/// Per-query knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    /// How many most-similar neighbors feed the candidate scores
    pub neighbor_k: usize,
    /// Drop items the user already has in the TrainSet
    pub exclude_seen: bool,
    /// Maximum length of the returned list
    pub top_n: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self::for_mode(Mode::User)
    }
}

impl RecommendOptions {
    /// Defaults for a mode: 10 results, seen items excluded, and the mode's
    /// usual neighborhood size (80 users, 10 items).
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            neighbor_k: mode.default_neighbors(),
            exclude_seen: true,
            top_n: 10,
        }
    }
}
