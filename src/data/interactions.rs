// InteractionSet: the TrainSet / TestSet representation.
//
// An ordered map from one entity id to a sorted, duplicate-free list of the
// ids it interacted with. Ordered iteration keeps every downstream loop
// (index building, evaluation sums) deterministic.

use std::collections::BTreeMap;

/// Sparse binary interaction matrix stored row-wise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionSet {
    rows: BTreeMap<u32, Vec<u32>>,
}

pub type TrainSet = InteractionSet;
pub type TestSet = InteractionSet;

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (row, column) pairs. Repeated pairs collapse to one.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut rows: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (row, col) in pairs {
            rows.entry(row).or_default().push(col);
        }
        for cols in rows.values_mut() {
            cols.sort_unstable();
            cols.dedup();
        }
        Self { rows }
    }

    /// Add one interaction. Returns false if it was already present.
    pub fn insert(&mut self, row: u32, col: u32) -> bool {
        let cols = self.rows.entry(row).or_default();
        match cols.binary_search(&col) {
            Ok(_) => false,
            Err(pos) => {
                cols.insert(pos, col);
                true
            }
        }
    }

    /// The sorted columns of a row, or None if the row has no interactions.
    pub fn items(&self, row: u32) -> Option<&[u32]> {
        self.rows.get(&row).map(Vec::as_slice)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.rows
            .get(&row)
            .is_some_and(|cols| cols.binary_search(&col).is_ok())
    }

    pub fn contains_row(&self, row: u32) -> bool {
        self.rows.contains_key(&row)
    }

    /// Row ids in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// (row, columns) pairs in ascending row order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.rows.iter().map(|(&row, cols)| (row, cols.as_slice()))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of stored interactions.
    pub fn interaction_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Swap rows and columns (user → items becomes item → users).
    ///
    /// Rows are visited in ascending order, so every transposed row comes
    /// out already sorted.
    pub fn transpose(&self) -> InteractionSet {
        let mut rows: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (&row, cols) in &self.rows {
            for &col in cols {
                rows.entry(col).or_default().push(row);
            }
        }
        InteractionSet { rows }
    }
}
