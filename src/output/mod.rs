// Output formatting: terminal display and JSON reports.

pub mod terminal;

use anyhow::Result;
use serde::Serialize;

use crate::data::interner::Interner;
use crate::evaluate::metrics::Metrics;
use crate::recommend::ScoredItem;
use crate::similarity::matrix::Neighbor;
use crate::similarity::{Mode, Weighting};

/// Settings plus scores of one evaluation, as printed by `cofi evaluate`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub mode: Mode,
    pub weighting: Weighting,
    pub neighbors: usize,
    pub top_n: usize,
    pub folds: u32,
    pub fold: u32,
    pub seed: u64,
    pub users: usize,
    pub metrics: Metrics,
}

/// A ranked entry with its raw identifier restored.
#[derive(Debug, Clone, Serialize)]
pub struct NamedScore {
    pub rank: usize,
    pub id: String,
    pub score: f64,
}

/// Resolve recommended item ids back to log identifiers.
pub fn name_items(list: &[ScoredItem], items: &Interner) -> Vec<NamedScore> {
    list.iter()
        .enumerate()
        .map(|(i, scored)| NamedScore {
            rank: i + 1,
            id: items.display(scored.item),
            score: scored.score,
        })
        .collect()
}

/// Resolve neighbor ids back to log identifiers.
pub fn name_neighbors(neighbors: &[Neighbor], names: &Interner) -> Vec<NamedScore> {
    neighbors
        .iter()
        .enumerate()
        .map(|(i, n)| NamedScore {
            rank: i + 1,
            id: names.display(n.id),
            score: n.score,
        })
        .collect()
}

/// Pretty-print any report as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
