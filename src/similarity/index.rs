// Inverted interaction index.
//
// For user-based similarity the buckets are item → users: every pair of users
// inside one bucket shares that item. Item-based flips it to user → items.
// `profiles` keeps the forward direction so the engine can read each
// entity's activity count without another pass.

use crate::data::interactions::{InteractionSet, TrainSet};

use super::Mode;

/// Forward and inverted views of the TrainSet for one mode.
#[derive(Debug, Clone)]
pub struct InteractionIndex {
    mode: Mode,
    /// entity → intermediaries it touched
    profiles: InteractionSet,
    /// intermediary → entities that touched it
    buckets: InteractionSet,
}

impl InteractionIndex {
    pub fn build(train: &TrainSet, mode: Mode) -> Self {
        let (profiles, buckets) = match mode {
            Mode::User => (train.clone(), train.transpose()),
            Mode::Item => {
                let by_item = train.transpose();
                (by_item, train.clone())
            }
        };
        Self {
            mode,
            profiles,
            buckets,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of intermediaries an entity touched (N[x]); 0 if unknown.
    pub fn activity(&self, entity: u32) -> usize {
        self.profiles.items(entity).map_or(0, <[u32]>::len)
    }

    pub fn profiles(&self) -> &InteractionSet {
        &self.profiles
    }

    pub fn buckets(&self) -> &InteractionSet {
        &self.buckets
    }

    /// Entities that share one intermediary, sorted ascending.
    pub fn bucket(&self, intermediary: u32) -> &[u32] {
        self.buckets.items(intermediary).unwrap_or(&[])
    }

    /// Σ |bucket|², an upper bound on the pair updates the engine performs.
    pub fn pair_work(&self) -> usize {
        self.buckets.iter().map(|(_, b)| b.len() * b.len()).sum()
    }
}
