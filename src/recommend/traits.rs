// Recommender trait: the seam between ranking and evaluation.
//
// The evaluator only needs "give me a ranked list for this user", so it takes
// any implementor. The neighborhood model is the real one; tests plug in
// fixed lists to check the metric arithmetic on its own.

use super::{RecommendOptions, ScoredItem};
use crate::error::Result;

/// Produces a ranked top-N list for one user.
///
/// `Sync` because the evaluator queries users from several threads.
pub trait Recommender: Sync {
    /// Ranked recommendations for `user`, at most `options.top_n` long.
    ///
    /// Fails with `UnknownUser("#<user>")` when the user has no training
    /// interactions; a known user with nothing to recommend gets an empty
    /// list.
    fn recommend(&self, user: u32, options: &RecommendOptions) -> Result<Vec<ScoredItem>>;
}
