// Offline evaluation: recall, precision, coverage and popularity of top-N
// lists against the held-out test set.

pub mod metrics;

use crate::data::interactions::{TestSet, TrainSet};
use crate::recommend::RecommendOptions;

/// Everything an evaluation reads. Nothing in here changes while it runs.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub train: &'a TrainSet,
    pub test: &'a TestSet,
    pub options: RecommendOptions,
    /// Generate per-user lists on the rayon pool
    pub parallel: bool,
    /// Draw a progress bar on stderr while generating lists
    pub show_progress: bool,
}

impl<'a> EvalContext<'a> {
    pub fn new(train: &'a TrainSet, test: &'a TestSet, options: RecommendOptions) -> Self {
        Self {
            train,
            test,
            options,
            parallel: true,
            show_progress: false,
        }
    }
}
