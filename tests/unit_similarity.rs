// Unit tests for the inverted index and the similarity engine.
//
// Covers the matrix contract (symmetry, no self entries, plain-variant
// bounds), the three-user worked example, each weighting variant, item mode,
// and agreement between the parallel and sequential builds.

use cofi::data::interactions::{InteractionSet, TrainSet};
use cofi::similarity::engine::SimilarityEngine;
use cofi::similarity::index::InteractionIndex;
use cofi::similarity::matrix::SimilarityMatrix;
use cofi::similarity::{Mode, Weighting};

const EPS: f64 = 1e-12;

/// u1:{i1,i2}  u2:{i1,i3}  u3:{i2,i3} as ids 0..3
fn worked_example() -> TrainSet {
    InteractionSet::from_pairs([(0, 0), (0, 1), (1, 0), (1, 2), (2, 1), (2, 2)])
}

/// Interactions drawn from a fixed linear congruential stream.
fn synthetic(users: u32, items: u32, per_user: u32) -> TrainSet {
    let mut state: u64 = 0x2545_f491;
    let mut pairs = Vec::new();
    for user in 0..users {
        for _ in 0..per_user {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            // Skew toward low item ids so some items get popular
            let r = (state >> 33) as u32 % (items * items);
            let item = (r as f64).sqrt() as u32;
            pairs.push((user, items - 1 - item.min(items - 1)));
        }
    }
    InteractionSet::from_pairs(pairs)
}

fn all_engines() -> Vec<SimilarityEngine> {
    let mut engines = Vec::new();
    for mode in [Mode::User, Mode::Item] {
        for weighting in [
            Weighting::Cooccurrence,
            Weighting::InverseFrequency,
            Weighting::PopularityNormalized,
        ] {
            engines.push(SimilarityEngine::new(mode, weighting).sequential());
        }
    }
    engines
}

fn assert_symmetric(m: &SimilarityMatrix) {
    for a in m.entities() {
        for n in m.neighbors(a) {
            assert!(
                (m.get(n.id, a) - n.score).abs() < EPS,
                "asymmetric pair ({a}, {}): {} vs {}",
                n.id,
                n.score,
                m.get(n.id, a)
            );
        }
    }
}

// ============================================================
// Worked example
// ============================================================

#[test]
fn worked_example_is_uniform_half() {
    let m = SimilarityEngine::new(Mode::User, Weighting::Cooccurrence).build(&worked_example());
    for a in 0..3 {
        for b in 0..3 {
            let expected = if a == b { 0.0 } else { 0.5 };
            assert!(
                (m.get(a, b) - expected).abs() < EPS,
                "similarity({a}, {b}) = {}",
                m.get(a, b)
            );
        }
    }
    assert_eq!(m.len(), 6);
}

#[test]
fn worked_example_neighbors_tie_break_by_id() {
    let m = SimilarityEngine::new(Mode::User, Weighting::Cooccurrence).build(&worked_example());
    let ids: Vec<u32> = m.neighbors(0).iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

// ============================================================
// Matrix contract across every mode and weighting
// ============================================================

#[test]
fn every_variant_is_symmetric() {
    let train = synthetic(40, 25, 6);
    for engine in all_engines() {
        let m = engine.build(&train);
        assert!(!m.is_empty(), "{engine:?} produced an empty matrix");
        assert_symmetric(&m);
    }
}

#[test]
fn no_variant_stores_self_similarity() {
    let train = synthetic(40, 25, 6);
    for engine in all_engines() {
        let m = engine.build(&train);
        for a in m.entities() {
            assert!(m.neighbors(a).iter().all(|n| n.id != a));
            assert_eq!(m.get(a, a), 0.0);
        }
    }
}

#[test]
fn plain_scores_within_unit_interval() {
    let train = synthetic(60, 30, 8);
    for mode in [Mode::User, Mode::Item] {
        let m = SimilarityEngine::new(mode, Weighting::Cooccurrence).build(&train);
        for a in m.entities() {
            for n in m.neighbors(a) {
                assert!(n.score > 0.0 && n.score <= 1.0 + EPS, "score {}", n.score);
            }
        }
    }
}

#[test]
fn plain_score_is_one_only_for_identical_profiles() {
    // u0 and u1 identical, u2 a superset of both
    let train = InteractionSet::from_pairs([
        (0, 0),
        (0, 1),
        (1, 0),
        (1, 1),
        (2, 0),
        (2, 1),
        (2, 2),
    ]);
    let m = SimilarityEngine::new(Mode::User, Weighting::Cooccurrence).build(&train);
    assert!((m.get(0, 1) - 1.0).abs() < EPS);
    assert!(m.get(0, 2) < 1.0);
    assert!((m.get(0, 2) - 2.0 / 6f64.sqrt()).abs() < EPS);
}

#[test]
fn rows_are_ranked() {
    let train = synthetic(50, 20, 7);
    let m = SimilarityEngine::new(Mode::User, Weighting::InverseFrequency).build(&train);
    for a in m.entities() {
        for pair in m.neighbors(a).windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].id < pair[1].id)
            );
        }
    }
}

// ============================================================
// Weighting variants
// ============================================================

#[test]
fn inverse_frequency_matches_hand_computation() {
    // i0 shared by u0,u1 (bucket 2); i1 shared by u0,u1,u2 (bucket 3)
    let train = InteractionSet::from_pairs([(0, 0), (0, 1), (1, 0), (1, 1), (2, 1)]);
    let m = SimilarityEngine::new(Mode::User, Weighting::InverseFrequency).build(&train);
    let c01 = 1.0 / 3f64.ln() + 1.0 / 4f64.ln();
    assert!((m.get(0, 1) - c01 / 2.0).abs() < EPS);
    let c02 = 1.0 / 4f64.ln();
    assert!((m.get(0, 2) - c02 / 2f64.sqrt()).abs() < EPS);
}

#[test]
fn inverse_frequency_ranks_niche_overlap_higher() {
    // u0 shares a niche item with u1 and a blockbuster with u2
    let mut pairs = vec![(0, 0), (1, 0), (0, 1), (2, 1)];
    for user in 3..30 {
        pairs.push((user, 1));
    }
    let train = InteractionSet::from_pairs(pairs);
    let plain = SimilarityEngine::new(Mode::User, Weighting::Cooccurrence).build(&train);
    let iif = SimilarityEngine::new(Mode::User, Weighting::InverseFrequency).build(&train);
    assert!((plain.get(0, 1) - plain.get(0, 2)).abs() < EPS);
    assert!(iif.get(0, 1) > iif.get(0, 2));
}

#[test]
fn popularity_normalized_row_maxima_bounded() {
    let train = synthetic(40, 25, 6);
    let m = SimilarityEngine::new(Mode::Item, Weighting::PopularityNormalized).build(&train);
    for a in m.entities() {
        assert!(m.row_max(a) <= 1.0 + EPS);
    }
}

// ============================================================
// Item mode and the index
// ============================================================

#[test]
fn item_mode_uses_user_buckets() {
    let train = worked_example();
    let index = InteractionIndex::build(&train, Mode::Item);
    // user 0 touched items 0 and 1
    assert_eq!(index.bucket(0), &[0, 1]);
    let m = SimilarityEngine::new(Mode::Item, Weighting::Cooccurrence).build(&train);
    // every item pair shares exactly one of two users each
    assert!((m.get(0, 1) - 0.5).abs() < EPS);
    assert!((m.get(1, 2) - 0.5).abs() < EPS);
}

#[test]
fn single_user_buckets_produce_nothing() {
    let train = InteractionSet::from_pairs([(0, 0), (1, 1), (2, 2)]);
    let m = SimilarityEngine::new(Mode::User, Weighting::Cooccurrence).build(&train);
    assert!(m.is_empty());
    assert_eq!(m.get(0, 1), 0.0);
}

#[test]
fn empty_train_set_builds_empty_matrix() {
    let m = SimilarityEngine::default().build(&InteractionSet::new());
    assert!(m.is_empty());
    assert_eq!(m.entity_count(), 0);
}

// ============================================================
// Parallel build
// ============================================================

#[test]
fn parallel_matches_sequential() {
    // Thousands of rows in user mode and hundreds in item mode, so the rayon
    // pool splits the work across many tasks in both.
    let train = synthetic(1500, 400, 12);
    for mode in [Mode::User, Mode::Item] {
        for weighting in [
            Weighting::Cooccurrence,
            Weighting::InverseFrequency,
            Weighting::PopularityNormalized,
        ] {
            let engine = SimilarityEngine::new(mode, weighting);
            let seq = engine.sequential().build(&train);
            let par = engine.build(&train);
            assert_eq!(seq.len(), par.len(), "{mode}/{weighting}");
            for a in seq.entities() {
                assert_eq!(seq.neighbors(a), par.neighbors(a), "{mode}/{weighting} row {a}");
            }
        }
    }
}

#[test]
fn parallel_build_is_reproducible() {
    let train = synthetic(300, 60, 12);
    let engine = SimilarityEngine::new(Mode::User, Weighting::InverseFrequency);
    let first = engine.build(&train);
    let second = engine.build(&train);
    for a in first.entities() {
        assert_eq!(first.neighbors(a), second.neighbors(a));
    }
}
