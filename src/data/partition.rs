// Seeded train/test partition of one fold.
//
// Each record is hashed together with the seed; it lands in the test set when
// `hash mod (folds + 1) == fold`. Hashing the record instead of drawing from a
// random stream means the assignment doesn't depend on line order, and a
// repeated (user, item) record always falls on the same side.

use sha2::{Digest, Sha256};

use crate::error::{CofiError, Result};

/// Parameters of a single train/test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Number of folds M. Records are spread over M + 1 buckets.
    pub folds: u32,
    /// Which bucket (0..=M) becomes the test set.
    pub fold: u32,
    pub seed: u64,
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            folds: 8,
            fold: 0,
            seed: 42,
        }
    }
}

impl Partition {
    pub fn new(folds: u32, fold: u32, seed: u64) -> Result<Self> {
        if folds == 0 {
            return Err(CofiError::InvalidPartition(
                "fold count must be at least 1".to_string(),
            ));
        }
        if fold > folds {
            return Err(CofiError::InvalidPartition(format!(
                "fold index {fold} out of range 0..={folds}"
            )));
        }
        Ok(Self { folds, fold, seed })
    }

    /// Bucket (0..=folds) assigned to a record.
    pub fn bucket(&self, user: &str, item: &str) -> u32 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(user.as_bytes());
        hasher.update([0u8]);
        hasher.update(item.as_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let hash = u64::from_be_bytes(prefix);

        (hash % (u64::from(self.folds) + 1)) as u32
    }

    /// Whether a record is held out for testing.
    pub fn is_test(&self, user: &str, item: &str) -> bool {
        self.bucket(user, item) == self.fold
    }
}
