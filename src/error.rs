// Typed failures for the recommender core.
//
// The library returns these so callers (and tests) can tell a malformed log
// apart from an empty evaluation or an unknown query user. The binary wraps
// them in anyhow with context, like every other error in main.rs.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CofiError>;

#[derive(Debug, Error)]
pub enum CofiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A log line (1-based) that can't be parsed.
    #[error("invalid input at line {line}: {reason}")]
    InvalidInput { line: usize, reason: String },

    /// Fold count, fold index or seed that don't describe a split.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// A metric would divide by the size of an empty set.
    #[error("{0} is empty")]
    EmptyDataset(&'static str),

    /// Recommendation requested for a user with no training interactions.
    ///
    /// `Recommender` implementations only see dense ids, so they report the
    /// user as `#<dense id>`. Callers holding the `Interner` re-raise it with
    /// the raw log id, as the CLI does.
    #[error("user {0} not found in training set")]
    UnknownUser(String),

    /// Neighbor lookup for an id that never appeared in the log.
    #[error("entity {0} not found")]
    UnknownEntity(String),
}

impl CofiError {
    pub(crate) fn invalid(line: usize, reason: impl Into<String>) -> Self {
        CofiError::InvalidInput {
            line,
            reason: reason.into(),
        }
    }
}
