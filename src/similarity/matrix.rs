// Sparse symmetric similarity matrix.
//
// Each row holds only the non-zero neighbors of one entity, pre-sorted by
// score descending with ascending neighbor id breaking ties. Neighborhood
// queries are then a prefix slice, and the tie order is part of the contract
// rather than an accident of hash iteration.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

/// One non-zero entry of a similarity row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: u32,
    pub score: f64,
}

/// Immutable sparse similarity matrix. Absent entries read as 0.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    rows: HashMap<u32, Vec<Neighbor>>,
}

/// Ranking order: higher score first, then lower id.
pub(crate) fn rank_order(a_score: f64, a_id: u32, b_score: f64, b_id: u32) -> Ordering {
    b_score
        .partial_cmp(&a_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_id.cmp(&b_id))
}

impl SimilarityMatrix {
    /// Build from unordered pair scores. Each (a, b) with a != b and a
    /// positive score is stored in both rows; self pairs and non-positive
    /// scores are dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ((u32, u32), f64)>,
    {
        let mut rows: HashMap<u32, Vec<Neighbor>> = HashMap::new();
        for ((a, b), score) in pairs {
            if a == b || !(score > 0.0) {
                continue;
            }
            rows.entry(a).or_default().push(Neighbor { id: b, score });
            rows.entry(b).or_default().push(Neighbor { id: a, score });
        }
        for row in rows.values_mut() {
            row.sort_by(|x, y| rank_order(x.score, x.id, y.score, y.id));
        }
        Self { rows }
    }

    /// similarity(a, b); 0 when a == b or no co-occurrence was recorded.
    ///
    /// Scans a's row, so cost is linear in its degree.
    pub fn get(&self, a: u32, b: u32) -> f64 {
        if a == b {
            return 0.0;
        }
        self.rows
            .get(&a)
            .and_then(|row| row.iter().find(|n| n.id == b))
            .map_or(0.0, |n| n.score)
    }

    /// All neighbors of an entity in ranking order.
    pub fn neighbors(&self, entity: u32) -> &[Neighbor] {
        self.rows.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The `k` most similar neighbors (fewer if the row is shorter).
    pub fn top_k(&self, entity: u32, k: usize) -> &[Neighbor] {
        let row = self.neighbors(entity);
        &row[..k.min(row.len())]
    }

    /// Largest score in a row, 0 for an empty row.
    pub fn row_max(&self, entity: u32) -> f64 {
        self.neighbors(entity).first().map_or(0.0, |n| n.score)
    }

    /// Number of entities with at least one neighbor.
    pub fn entity_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored directed entries (each unordered pair counts twice).
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entity ids that have a row, ascending.
    pub fn entities(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rows.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Rescale every entry in place; rows are re-ranked afterwards.
    pub(crate) fn map_scores<F>(&mut self, mut f: F)
    where
        F: FnMut(u32, u32, f64) -> f64,
    {
        for (&a, row) in self.rows.iter_mut() {
            for n in row.iter_mut() {
                n.score = f(a, n.id, n.score);
            }
            row.retain(|n| n.score > 0.0);
            row.sort_by(|x, y| rank_order(x.score, x.id, y.score, y.id));
        }
        self.rows.retain(|_, row| !row.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_storage() {
        let m = SimilarityMatrix::from_pairs([((0, 1), 0.5), ((1, 2), 0.25)]);
        assert_eq!(m.get(0, 1), 0.5);
        assert_eq!(m.get(1, 0), 0.5);
        assert_eq!(m.get(2, 1), 0.25);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.len(), 4);
        assert_eq!(m.entity_count(), 3);
    }

    #[test]
    fn test_self_and_zero_pairs_dropped() {
        let m = SimilarityMatrix::from_pairs([((3, 3), 1.0), ((0, 1), 0.0)]);
        assert!(m.is_empty());
        assert_eq!(m.get(3, 3), 0.0);
    }

    #[test]
    fn test_rows_ranked_with_id_tie_break() {
        let m = SimilarityMatrix::from_pairs([((0, 3), 0.5), ((0, 1), 0.5), ((0, 2), 0.9)]);
        let ids: Vec<u32> = m.neighbors(0).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(m.top_k(0, 2).len(), 2);
        assert_eq!(m.top_k(0, 10).len(), 3);
        assert_eq!(m.row_max(0), 0.9);
    }

    #[test]
    fn test_unknown_entity_is_empty_row() {
        let m = SimilarityMatrix::default();
        assert!(m.neighbors(7).is_empty());
        assert_eq!(m.row_max(7), 0.0);
    }
}
