// Co-occurrence similarity engine.
//
// Walks the inverted index once: every pair of entities inside a bucket
// shares that intermediary, so the pair's co-occurrence grows by the bucket's
// weight. Cost is Σ |bucket|² instead of comparing every entity pair over the
// whole catalog. Each accumulated count is then cosine-normalized:
//
//   similarity(a, b) = C[a][b] / sqrt(N[a] * N[b])
//
// where N[x] is how many intermediaries x touched.
//
// Accumulation is sharded by row: each entity `a` walks its own
// intermediaries and sums, for every entity `b > a` in those buckets, into a
// row-local map. Rows are independent, so the parallel build runs them on the
// rayon pool and collects them in entity order. No counter is shared, peak
// memory is bounded by the output, and every pair is summed in the same
// (ascending intermediary) order as in the sequential build, so both builds
// produce identical matrices.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::data::interactions::TrainSet;

use super::index::InteractionIndex;
use super::matrix::SimilarityMatrix;
use super::{Mode, Weighting};

/// Upper-triangle co-occurrence of one entity: (b, count) for b > a.
type Row = Vec<(u32, f64)>;

/// Builds a [`SimilarityMatrix`] for one mode and weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityEngine {
    pub mode: Mode,
    pub weighting: Weighting,
    /// Accumulate rows on the rayon pool.
    pub parallel: bool,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self {
            mode: Mode::User,
            weighting: Weighting::Cooccurrence,
            parallel: true,
        }
    }
}

impl SimilarityEngine {
    pub fn new(mode: Mode, weighting: Weighting) -> Self {
        Self {
            mode,
            weighting,
            ..Self::default()
        }
    }

    pub fn sequential(self) -> Self {
        Self {
            parallel: false,
            ..self
        }
    }

    /// Index the TrainSet for this engine's mode and build the matrix.
    pub fn build(&self, train: &TrainSet) -> SimilarityMatrix {
        let index = InteractionIndex::build(train, self.mode);
        self.build_from_index(&index)
    }

    /// Build from an index that was already constructed.
    ///
    /// The index's own mode wins over `self.mode`; they only differ if a
    /// caller built the index by hand.
    pub fn build_from_index(&self, index: &InteractionIndex) -> SimilarityMatrix {
        let profiles: Vec<(u32, &[u32])> = index.profiles().iter().collect();

        debug!(
            mode = %index.mode(),
            entities = profiles.len(),
            pair_work = index.pair_work(),
            "Accumulating co-occurrence"
        );

        let accumulate = |&(a, intermediaries): &(u32, &[u32])| {
            (a, accumulate_row(index, a, intermediaries, self.weighting))
        };
        let rows: Vec<(u32, Row)> = if self.parallel {
            profiles.par_iter().map(accumulate).collect()
        } else {
            profiles.iter().map(accumulate).collect()
        };

        let pairs = rows.into_iter().flat_map(|(a, row)| {
            row.into_iter().map(move |(b, count)| {
                let norm = (index.activity(a) as f64 * index.activity(b) as f64).sqrt();
                ((a, b), count / norm)
            })
        });
        let mut matrix = SimilarityMatrix::from_pairs(pairs);

        if self.weighting == Weighting::PopularityNormalized {
            normalize_by_row_max(&mut matrix);
        }

        info!(
            mode = %index.mode(),
            weighting = %self.weighting,
            entities = matrix.entity_count(),
            entries = matrix.len(),
            parallel = self.parallel,
            "Built similarity matrix"
        );

        matrix
    }
}

/// Contribution of one shared intermediary whose bucket has `len` entities.
fn bucket_weight(weighting: Weighting, len: usize) -> f64 {
    match weighting {
        Weighting::InverseFrequency => 1.0 / (1.0 + len as f64).ln(),
        Weighting::Cooccurrence | Weighting::PopularityNormalized => 1.0,
    }
}

/// Co-occurrence of `a` with every higher-id entity that shares one of its
/// intermediaries.
///
/// Buckets are sorted ascending, so the entities above `a` are a suffix.
/// Single-entity buckets never reach the inner loop.
fn accumulate_row(
    index: &InteractionIndex,
    a: u32,
    intermediaries: &[u32],
    weighting: Weighting,
) -> Row {
    let mut row: HashMap<u32, f64> = HashMap::new();
    for &intermediary in intermediaries {
        let bucket = index.bucket(intermediary);
        let higher = &bucket[bucket.partition_point(|&b| b <= a)..];
        if higher.is_empty() {
            continue;
        }
        let weight = bucket_weight(weighting, bucket.len());
        for &b in higher {
            *row.entry(b).or_insert(0.0) += weight;
        }
    }
    row.into_iter().collect()
}

/// Divide each score by the geometric mean of both rows' maxima.
///
/// Every row's strongest neighbor moves toward 1 no matter how popular the
/// entity is, and the geometric mean keeps the matrix symmetric.
fn normalize_by_row_max(matrix: &mut SimilarityMatrix) {
    let maxima: HashMap<u32, f64> = matrix
        .entities()
        .into_iter()
        .map(|entity| (entity, matrix.row_max(entity)))
        .collect();

    matrix.map_scores(|a, b, score| {
        let a_max = maxima.get(&a).copied().unwrap_or(0.0);
        let b_max = maxima.get(&b).copied().unwrap_or(0.0);
        let scale = (a_max * b_max).sqrt();
        if scale > 0.0 {
            score / scale
        } else {
            0.0
        }
    });
}
