//! Degenerate inputs through the public API.

use rank_select::diversity::{select, select_nonempty, MmrConfig, MmrSelector};
use rank_select::explain::select_explained;
use rank_select::similarity::{score, score_all, Candidate};
use rank_select::SelectError;

fn vecs(rows: &[&[f32]]) -> Vec<Vec<f32>> {
    rows.iter().map(|r| r.to_vec()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Zero vectors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_candidate_is_neutral() {
    assert_eq!(score(&[1.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);

    let candidates = vecs(&[&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]]);
    let mut selector = MmrSelector::new(&[1.0, 0.0], &candidates, MmrConfig::new(0.7, 2)).unwrap();
    assert_eq!(selector.relevance(0), Some(0.0));
    assert_eq!(selector.next(), Some(1));
    // Nothing is similar to a zero vector, including the pick.
    assert_eq!(selector.redundancy(0), Some(0.0));
}

#[test]
fn zero_query_falls_back_to_index_order_first() {
    let candidates = vecs(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
    let selection = select(&[0.0, 0.0], &candidates, MmrConfig::new(0.7, 2)).unwrap();
    // Every relevance is 0, so the first pick is index 0; the second avoids
    // redundancy with it.
    assert_eq!(selection.indices(), &[0, 1]);
}

#[test]
fn all_zero_candidates_select_in_index_order() {
    let candidates = vec![vec![0.0f32; 4]; 6];
    let selection = select(&[1.0, 0.0, 0.0, 0.0], &candidates, MmrConfig::new(0.7, 3)).unwrap();
    assert_eq!(selection.indices(), &[0, 1, 2]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Magnitude extremes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn huge_finite_components_score_by_direction() {
    assert!((score(&[1e20, 0.0], &[1e20, 0.0]).unwrap() - 1.0).abs() < 1e-6);
    assert!((score(&[1e20, 0.0], &[-2e25, 0.0]).unwrap() + 1.0).abs() < 1e-6);
    assert!(score(&[1e20, 0.0], &[0.0, 1e30]).unwrap().abs() < 1e-6);
}

#[test]
fn tiny_nonzero_vectors_are_not_zero_vectors() {
    let s = score(&[1e-23, 2e-23], &[1.0, 2.0]).unwrap();
    assert!((s - 1.0).abs() < 1e-6, "got {s}");
    assert_eq!(score(&[0.0, 0.0], &[1e-23, 0.0]).unwrap(), 0.0);
}

#[test]
fn selection_ignores_candidate_scale() {
    let unit = vecs(&[&[1.0, 0.0], &[0.9, 0.1], &[0.0, 1.0], &[-1.0, 0.2]]);
    let scaled: Vec<Vec<f32>> = unit
        .iter()
        .zip([1e20f32, 1e-25, 1e15, 1e-30])
        .map(|(v, k)| v.iter().map(|x| x * k).collect())
        .collect();
    let config = MmrConfig::new(0.7, 2);
    assert_eq!(
        select(&[1.0, 0.0], &unit, config).unwrap(),
        select(&[1.0, 0.0], &scaled, config).unwrap()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Opposed candidates
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn opposite_of_first_pick_is_most_novel() {
    let candidates = vecs(&[&[0.0, 1.0], &[1.0, 0.05], &[1.0, 0.0], &[-1.0, 0.0]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.0, 2)).unwrap();
    assert_eq!(selection.indices(), &[2, 3]);
}

#[test]
fn anti_correlated_candidate_beats_orthogonal_one() {
    let candidates = vecs(&[&[1.0, 1.0], &[1.0, -1.0], &[0.3, -1.0], &[0.0, 1.0]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.5, 2)).unwrap();
    assert_eq!(selection.indices(), &[0, 2]);
}

#[test]
fn traced_redundancy_can_go_negative() {
    let candidates = vecs(&[&[1.0, 0.2], &[-1.0, 0.3], &[-0.9, -0.4], &[0.1, 1.0], &[0.8, 0.1]]);
    let trace = select_explained(&[1.0, 0.0], &candidates, MmrConfig::new(0.3, 4)).unwrap();
    for (k, step) in trace.steps.iter().enumerate().skip(1) {
        let expected = trace.steps[..k]
            .iter()
            .map(|prev| score(&candidates[step.index], &candidates[prev.index]).unwrap())
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(
            (step.redundancy - expected).abs() < 1e-6,
            "step {k}: {} vs {expected}",
            step.redundancy
        );
    }
    assert!(trace.steps.iter().any(|s| s.redundancy < 0.0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Duplicates
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn identical_candidates_select_in_index_order() {
    let candidates = vec![vec![0.3f32, 0.4, 0.5]; 8];
    let selection = select(&[0.3, 0.4, 0.5], &candidates, MmrConfig::default().with_cap(4)).unwrap();
    assert_eq!(selection.indices(), &[0, 1, 2, 3]);
}

#[test]
fn duplicate_of_first_pick_loses_to_a_novel_candidate() {
    let candidates = vecs(&[&[1.0, 0.0], &[1.0, 0.0], &[0.6, 0.8]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.5, 2)).unwrap();
    // cand 1: 0.5 * 1.0 - 0.5 * 1.0 = 0; cand 2: 0.5 * 0.6 - 0.5 * 0.6 = 0,
    // then the tie goes to the smaller index.
    assert_eq!(selection.indices(), &[0, 1]);

    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.4, 2)).unwrap();
    // cand 1: 0.4 - 0.6 = -0.2; cand 2: 0.24 - 0.36 = -0.12.
    assert_eq!(selection.indices(), &[0, 2]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cap and size boundaries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cap_of_one_is_most_relevant() {
    let candidates = vecs(&[&[0.0, 1.0], &[0.6, 0.8], &[0.8, 0.6]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.0, 1)).unwrap();
    assert_eq!(selection.indices(), &[2]);
}

#[test]
fn cap_equal_to_count_is_pass_through() {
    let candidates = vecs(&[&[0.0, 1.0], &[1.0, 0.0]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.7, 2)).unwrap();
    assert_eq!(selection.indices(), &[0, 1]);
}

#[test]
fn one_over_cap_runs_selection() {
    let candidates = vecs(&[&[0.0, 1.0], &[1.0, 0.0], &[0.9, 0.1]]);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.7, 2)).unwrap();
    assert_eq!(selection[0], 1);
    assert_eq!(selection.len(), 2);
}

#[test]
fn empty_input() {
    let empty: Vec<Vec<f32>> = Vec::new();
    assert!(select(&[1.0], &empty, MmrConfig::default()).unwrap().is_empty());
    assert!(matches!(
        select_nonempty(&[1.0], &empty, MmrConfig::default()),
        Err(SelectError::EmptyCandidateSet)
    ));
}

#[test]
fn zero_cap_rejected_before_anything_else() {
    let empty: Vec<Vec<f32>> = Vec::new();
    assert!(matches!(
        select(&[1.0], &empty, MmrConfig::new(0.7, 0)),
        Err(SelectError::InvalidCap { cap: 0 })
    ));
}

#[test]
fn relevance_weight_bounds() {
    let candidates = vecs(&[&[1.0, 0.0]]);
    for lambda in [0.0, 0.5, 1.0] {
        assert!(select(&[1.0, 0.0], &candidates, MmrConfig::new(lambda, 1)).is_ok());
    }
    for lambda in [-0.01, 1.01, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            select(&[1.0, 0.0], &candidates, MmrConfig::new(lambda, 1)),
            Err(SelectError::InvalidRelevanceWeight { .. })
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dimension mismatch
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn query_longer_than_candidate() {
    let err = score(&[1.0, 0.0, 0.0], &[1.0, 0.0]).unwrap_err();
    assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");
}

#[test]
fn one_bad_candidate_fails_the_batch() {
    let candidates = vecs(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 0.0, 0.0], &[0.5, 0.5]]);
    for cap in [1, 2, 10] {
        assert!(matches!(
            select(&[1.0, 0.0], &candidates, MmrConfig::new(0.7, cap)),
            Err(SelectError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
    }
}

#[test]
fn candidate_records_score_like_vectors() {
    let candidates = Candidate::enumerate(vecs(&[&[1.0, 0.0], &[0.0, 1.0], &[0.7, 0.7]]));
    let relevance = score_all(&[1.0, 0.0], &candidates).unwrap();
    assert_eq!(relevance.len(), 3);
    let selection = select(&[1.0, 0.0], &candidates, MmrConfig::new(0.7, 2)).unwrap();
    let picked: Vec<usize> = selection.pick(&candidates).iter().map(|c| c.index).collect();
    assert_eq!(picked, selection.indices());
}
