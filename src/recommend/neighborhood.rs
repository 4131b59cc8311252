// Neighborhood recommender over a prebuilt similarity matrix.
//
// User mode: the target's K most similar users vote for their items with
// their similarity score. Item mode: every item the target already has votes
// for its K most similar items. Votes for the same candidate add up, and the
// candidates are ranked by total with ascending item id breaking ties.
//
// The interaction signal is binary, so each vote carries weight 1 times the
// similarity.

use std::collections::HashMap;

use super::traits::Recommender;
use super::{RecommendOptions, ScoredItem};
use crate::data::interactions::TrainSet;
use crate::error::{CofiError, Result};
use crate::similarity::matrix::{rank_order, Neighbor, SimilarityMatrix};
use crate::similarity::Mode;

/// Read-only view over the TrainSet and the matrix built from it.
///
/// The matrix must have been built from this TrainSet in the same mode.
pub struct NeighborhoodRecommender<'a> {
    train: &'a TrainSet,
    similarity: &'a SimilarityMatrix,
    mode: Mode,
}

impl<'a> NeighborhoodRecommender<'a> {
    pub fn new(train: &'a TrainSet, similarity: &'a SimilarityMatrix, mode: Mode) -> Self {
        Self {
            train,
            similarity,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The `limit` entities most similar to `entity` (users or items,
    /// depending on the mode).
    pub fn similar(&self, entity: u32, limit: usize) -> &'a [Neighbor] {
        self.similarity.top_k(entity, limit)
    }

    fn user_based(&self, seen: &[u32], options: &RecommendOptions, user: u32) -> HashMap<u32, f64> {
        let mut scores: HashMap<u32, f64> = HashMap::new();
        for neighbor in self.similarity.top_k(user, options.neighbor_k) {
            let Some(items) = self.train.items(neighbor.id) else {
                continue;
            };
            for &item in items {
                if options.exclude_seen && seen.binary_search(&item).is_ok() {
                    continue;
                }
                *scores.entry(item).or_insert(0.0) += neighbor.score;
            }
        }
        scores
    }

    fn item_based(&self, seen: &[u32], options: &RecommendOptions) -> HashMap<u32, f64> {
        let mut scores: HashMap<u32, f64> = HashMap::new();
        for &owned in seen {
            for neighbor in self.similarity.top_k(owned, options.neighbor_k) {
                if options.exclude_seen && seen.binary_search(&neighbor.id).is_ok() {
                    continue;
                }
                *scores.entry(neighbor.id).or_insert(0.0) += neighbor.score;
            }
        }
        scores
    }
}

impl Recommender for NeighborhoodRecommender<'_> {
    fn recommend(&self, user: u32, options: &RecommendOptions) -> Result<Vec<ScoredItem>> {
        let seen = self
            .train
            .items(user)
            .ok_or_else(|| CofiError::UnknownUser(format!("#{user}")))?;

        if options.top_n == 0 {
            return Ok(Vec::new());
        }

        let scores = match self.mode {
            Mode::User => self.user_based(seen, options, user),
            Mode::Item => self.item_based(seen, options),
        };

        Ok(rank(scores, options.top_n))
    }
}

/// Sort accumulated scores (descending, ties by item id) and keep `top_n`.
pub fn rank(scores: HashMap<u32, f64>, top_n: usize) -> Vec<ScoredItem> {
    let mut ranked: Vec<ScoredItem> = scores
        .into_iter()
        .map(|(item, score)| ScoredItem { item, score })
        .collect();
    ranked.sort_by(|a, b| rank_order(a.score, a.item, b.score, b.item));
    ranked.truncate(top_n);
    ranked
}
