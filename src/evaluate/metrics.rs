// Top-N accuracy, diversity and novelty metrics.
//
// Every training user gets one recommendation list, R(u). With T(u) the
// user's held-out items and N the configured list length:
//
//   recall     = Σ |R(u) ∩ T(u)| / Σ |T(u)|
//   precision  = Σ |R(u) ∩ T(u)| / (users * N)
//   coverage   = |∪ R(u)| / |∪ train(u)|
//   popularity = Σ Σ ln(1 + pop(i)) / (users * N)
//
// Precision and popularity divide by the configured N even when a list came
// back shorter; a user the model can't fill a list for is counted as missed
// slots, not dropped from the average.
//
// A zero denominator is an EmptyDataset error rather than 0 or NaN.
//
// Lists are generated once (optionally in parallel) and kept in user order;
// all sums below run sequentially over that order, so the metrics don't
// depend on how many threads generated the lists.

use std::collections::{BTreeSet, HashMap};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use super::EvalContext;
use crate::data::interactions::{TestSet, TrainSet};
use crate::error::{CofiError, Result};
use crate::recommend::traits::Recommender;
use crate::recommend::ScoredItem;

/// The four evaluation scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub recall: f64,
    pub precision: f64,
    pub coverage: f64,
    pub popularity: f64,
}

/// Recommendation lists for every training user, in ascending user order.
#[derive(Debug, Clone)]
pub struct RecommendationRun {
    pub lists: Vec<(u32, Vec<ScoredItem>)>,
    /// Configured list length, the per-user precision/popularity denominator
    pub top_n: usize,
}

impl RecommendationRun {
    /// Number of recommended items that appear in the user's held-out set.
    fn hits(&self, test: &TestSet) -> usize {
        self.lists
            .iter()
            .map(|(user, list)| {
                list.iter()
                    .filter(|scored| test.contains(*user, scored.item))
                    .count()
            })
            .sum()
    }

    /// Σ |T(u)| over the users in this run.
    fn held_out(&self, test: &TestSet) -> usize {
        self.lists
            .iter()
            .map(|(user, _)| test.items(*user).map_or(0, <[u32]>::len))
            .sum()
    }

    /// users * configured N
    fn slots(&self) -> Result<usize> {
        if self.lists.is_empty() {
            return Err(CofiError::EmptyDataset("training set"));
        }
        if self.top_n == 0 {
            return Err(CofiError::EmptyDataset("top-N list"));
        }
        Ok(self.lists.len() * self.top_n)
    }
}

/// Ask the recommender for every training user's list.
pub fn generate(recommender: &dyn Recommender, ctx: &EvalContext<'_>) -> Result<RecommendationRun> {
    let users: Vec<u32> = ctx.train.rows().collect();
    let pb = progress_bar(users.len(), ctx.show_progress);

    let produce = |&user: &u32| -> Result<(u32, Vec<ScoredItem>)> {
        let list = recommender.recommend(user, &ctx.options)?;
        pb.inc(1);
        Ok((user, list))
    };

    let lists = if ctx.parallel {
        users.par_iter().map(produce).collect::<Result<Vec<_>>>()?
    } else {
        users.iter().map(produce).collect::<Result<Vec<_>>>()?
    };
    pb.finish_and_clear();

    Ok(RecommendationRun {
        lists,
        top_n: ctx.options.top_n,
    })
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Recommending [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Share of held-out interactions that were recommended.
pub fn recall(run: &RecommendationRun, test: &TestSet) -> Result<f64> {
    let held_out = run.held_out(test);
    if held_out == 0 {
        return Err(CofiError::EmptyDataset("test set"));
    }
    Ok(run.hits(test) as f64 / held_out as f64)
}

/// Share of recommendation slots filled with a held-out item.
///
/// Needs at least one held-out interaction: without any, a precision of 0
/// would only say the test set is empty.
pub fn precision(run: &RecommendationRun, test: &TestSet) -> Result<f64> {
    if run.held_out(test) == 0 {
        return Err(CofiError::EmptyDataset("test set"));
    }
    let slots = run.slots()?;
    Ok(run.hits(test) as f64 / slots as f64)
}

/// Share of the training catalog that shows up in at least one list.
pub fn coverage(run: &RecommendationRun, train: &TrainSet) -> Result<f64> {
    let catalog: BTreeSet<u32> = train
        .iter()
        .flat_map(|(_, items)| items.iter().copied())
        .collect();
    if catalog.is_empty() {
        return Err(CofiError::EmptyDataset("item universe"));
    }
    let recommended: BTreeSet<u32> = run
        .lists
        .iter()
        .flat_map(|(_, list)| list.iter().map(|s| s.item))
        .collect();
    Ok(recommended.len() as f64 / catalog.len() as f64)
}

/// Mean ln(1 + popularity) per recommendation slot. Lower means more novel.
pub fn popularity(run: &RecommendationRun, train: &TrainSet) -> Result<f64> {
    let slots = run.slots()?;
    let counts = item_popularity(train);
    let total: f64 = run
        .lists
        .iter()
        .flat_map(|(_, list)| list.iter())
        .map(|scored| {
            let pop = counts.get(&scored.item).copied().unwrap_or(0);
            (1.0 + pop as f64).ln()
        })
        .sum();
    Ok(total / slots as f64)
}

/// Number of training users per item.
pub fn item_popularity(train: &TrainSet) -> HashMap<u32, usize> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for (_, items) in train.iter() {
        for &item in items {
            *counts.entry(item).or_insert(0) += 1;
        }
    }
    counts
}

/// Generate every list once and compute all four metrics from it.
pub fn evaluate(recommender: &dyn Recommender, ctx: &EvalContext<'_>) -> Result<Metrics> {
    let run = generate(recommender, ctx)?;

    let metrics = Metrics {
        recall: recall(&run, ctx.test)?,
        precision: precision(&run, ctx.test)?,
        coverage: coverage(&run, ctx.train)?,
        popularity: popularity(&run, ctx.train)?,
    };

    info!(
        users = run.lists.len(),
        top_n = run.top_n,
        recall = metrics.recall,
        precision = metrics.precision,
        coverage = metrics.coverage,
        popularity = metrics.popularity,
        "Evaluation complete"
    );

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::interactions::InteractionSet;

    fn run_of(lists: Vec<(u32, Vec<u32>)>, top_n: usize) -> RecommendationRun {
        RecommendationRun {
            lists: lists
                .into_iter()
                .map(|(u, items)| {
                    let list = items
                        .into_iter()
                        .map(|item| ScoredItem { item, score: 1.0 })
                        .collect();
                    (u, list)
                })
                .collect(),
            top_n,
        }
    }

    #[test]
    fn test_recall_and_precision_counts() {
        let run = run_of(vec![(0, vec![1, 2]), (1, vec![3])], 2);
        let test = InteractionSet::from_pairs([(0, 1), (0, 9), (1, 3), (1, 8)]);
        // 2 hits out of 4 held out, over 2 users * 2 slots
        assert!((recall(&run, &test).unwrap() - 0.5).abs() < 1e-12);
        assert!((precision(&run, &test).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_precision_uses_configured_n() {
        // One hit from a single-item list, but N = 10
        let run = run_of(vec![(0, vec![1])], 10);
        let test = InteractionSet::from_pairs([(0, 1)]);
        assert!((precision(&run, &test).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_test_users_outside_run_are_ignored() {
        let run = run_of(vec![(0, vec![1])], 1);
        let test = InteractionSet::from_pairs([(0, 1), (7, 1), (7, 2)]);
        assert!((recall(&run, &test).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_top_n_is_empty_dataset() {
        let run = run_of(vec![(0, vec![])], 0);
        let train = InteractionSet::from_pairs([(0, 1)]);
        assert!(matches!(
            popularity(&run, &train),
            Err(CofiError::EmptyDataset("top-N list"))
        ));
    }

    #[test]
    fn test_item_popularity_counts_users() {
        let train = InteractionSet::from_pairs([(0, 1), (1, 1), (1, 2)]);
        let counts = item_popularity(&train);
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&2], 1);
    }
}
