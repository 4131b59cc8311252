// Data layer: log parsing, id interning, and the train/test split.

pub mod interactions;
pub mod interner;
pub mod loader;
pub mod partition;

use serde::Serialize;
use tracing::info;

use interactions::{InteractionSet, TestSet, TrainSet};
use interner::Interner;
use loader::Record;
use partition::Partition;

/// Everything the core needs from the raw log: id mappings plus the two
/// interaction sets. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub users: Interner,
    pub items: Interner,
    pub train: TrainSet,
    pub test: TestSet,
}

/// Summary counts for the `stats` command.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub users: usize,
    pub items: usize,
    pub train_users: usize,
    pub train_interactions: usize,
    pub test_users: usize,
    pub test_interactions: usize,
    /// train_interactions / (train_users * train_items)
    pub train_density: f64,
}

impl Dataset {
    /// Intern every record and split it with the given partition.
    ///
    /// Interning covers both sides of the split so a test-only item still
    /// gets an id (it just never appears in the training index).
    pub fn split(records: &[Record], partition: &Partition) -> Self {
        let users = Interner::from_names(records.iter().map(|r| r.user.as_str()));
        let items = Interner::from_names(records.iter().map(|r| r.item.as_str()));

        let mut train_pairs = Vec::new();
        let mut test_pairs = Vec::new();
        for record in records {
            // Both lookups succeed: every record was interned above.
            let (Some(user), Some(item)) = (users.id(&record.user), items.id(&record.item)) else {
                continue;
            };
            if partition.is_test(&record.user, &record.item) {
                test_pairs.push((user, item));
            } else {
                train_pairs.push((user, item));
            }
        }

        let dataset = Self {
            users,
            items,
            train: InteractionSet::from_pairs(train_pairs),
            test: InteractionSet::from_pairs(test_pairs),
        };

        info!(
            users = dataset.users.len(),
            items = dataset.items.len(),
            train = dataset.train.interaction_count(),
            test = dataset.test.interaction_count(),
            fold = partition.fold,
            folds = partition.folds,
            "Partitioned interactions"
        );

        dataset
    }

    pub fn stats(&self) -> DatasetStats {
        let train_interactions = self.train.interaction_count();
        let train_users = self.train.row_count();
        let train_items = self.train.transpose().row_count();
        let cells = train_users * train_items;
        let train_density = if cells == 0 {
            0.0
        } else {
            train_interactions as f64 / cells as f64
        };

        DatasetStats {
            users: self.users.len(),
            items: self.items.len(),
            train_users,
            train_interactions,
            test_users: self.test.row_count(),
            test_interactions: self.test.interaction_count(),
            train_density,
        }
    }
}
