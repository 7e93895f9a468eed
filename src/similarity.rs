//! Relevance scoring against a reference query.
//!
//! Relevance is cosine similarity: `dot(a, b) / (‖a‖ · ‖b‖)`, in `[-1, 1]`.
//! A zero-magnitude vector carries no direction, so it scores 0 against
//! anything rather than faulting.
//!
//! Unlike the kernels in [`crate::simd`], every function here checks that
//! the vectors share one dimensionality and reports
//! [`SelectError::DimensionMismatch`] otherwise.
//!
//! # Example
//!
//! ```rust
//! use rank_select::similarity::{score, score_all};
//!
//! let query: [f32; 2] = [1.0, 0.0];
//! assert!((score(&query, &[2.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
//!
//! let candidates: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
//! let relevance = score_all(&query, &candidates).unwrap();
//! assert_eq!(relevance.len(), 2);
//! assert!(relevance[1].abs() < 1e-6);
//!
//! assert!(score(&[1.0, 0.0, 0.0], &[1.0, 0.0]).is_err());
//! ```

use crate::{simd, Result, SelectError};

/// One extracted interaction, as the core sees it: an original-order index
/// and its embedding. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// 0-based position in extraction order.
    pub index: usize,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Candidate {
    /// Create a candidate.
    #[must_use]
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    /// Number the embeddings in order, starting from 0.
    #[must_use]
    pub fn enumerate(embeddings: Vec<Vec<f32>>) -> Vec<Self> {
        embeddings
            .into_iter()
            .enumerate()
            .map(|(index, embedding)| Self { index, embedding })
            .collect()
    }

    /// Embedding dimensionality.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.embedding.len()
    }
}

impl AsRef<[f32]> for Candidate {
    fn as_ref(&self) -> &[f32] {
        &self.embedding
    }
}

/// A candidate position with its relevance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCandidate {
    /// Original-order index.
    pub index: usize,
    /// Cosine similarity to the query.
    pub relevance: f32,
}

/// Cosine similarity of two equal-length vectors.
///
/// # Errors
///
/// [`SelectError::DimensionMismatch`] if the lengths differ. `expected` is the
/// length of `query`.
#[inline]
pub fn score(query: &[f32], candidate: &[f32]) -> Result<f32> {
    if query.len() != candidate.len() {
        return Err(SelectError::DimensionMismatch {
            expected: query.len(),
            got: candidate.len(),
        });
    }
    Ok(simd::cosine(query, candidate))
}

/// Check that every candidate has the query's dimensionality.
///
/// Returns that dimensionality. Runs before any scoring so a bad batch fails
/// without partial work.
///
/// # Errors
///
/// [`SelectError::DimensionMismatch`] naming the first offending length.
pub fn check_dimensions<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> Result<usize> {
    let dim = query.len();
    match candidates.iter().map(AsRef::as_ref).find(|c| c.len() != dim) {
        Some(bad) => Err(SelectError::DimensionMismatch {
            expected: dim,
            got: bad.len(),
        }),
        None => Ok(dim),
    }
}

/// Relevance of every candidate, indexed by candidate position.
///
/// `result[i]` is `score(query, candidates[i])`. With the `parallel` feature
/// candidates are scored on the rayon pool; results are identical.
///
/// # Errors
///
/// [`SelectError::DimensionMismatch`] if any candidate disagrees with the
/// query's length.
pub fn score_all<V>(query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
where
    V: AsRef<[f32]> + Sync,
{
    check_dimensions(query, candidates)?;
    Ok(map_scores(candidates, |c| simd::cosine(query, c.as_ref())))
}

/// Map each item to a score, on the rayon pool when `parallel` is enabled.
///
/// Output order always matches input order.
#[cfg(feature = "parallel")]
pub(crate) fn map_scores<T, F>(items: &[T], f: F) -> Vec<f32>
where
    T: Sync,
    F: Fn(&T) -> f32 + Sync + Send,
{
    use rayon::prelude::*;
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_scores<T, F>(items: &[T], f: F) -> Vec<f32>
where
    T: Sync,
    F: Fn(&T) -> f32 + Sync + Send,
{
    items.iter().map(f).collect()
}

/// Score candidates and sort by descending relevance.
///
/// Ties keep the smaller original index first, matching the tie-break used
/// by [`crate::diversity::select`].
///
/// # Errors
///
/// Same as [`score_all`].
pub fn rank_by_relevance<V>(query: &[f32], candidates: &[V]) -> Result<Vec<ScoredCandidate>>
where
    V: AsRef<[f32]> + Sync,
{
    let mut scored: Vec<ScoredCandidate> = score_all(query, candidates)?
        .into_iter()
        .enumerate()
        .map(|(index, relevance)| ScoredCandidate { index, relevance })
        .collect();
    // Stable sort keeps equal relevance in index order. Adding 0.0 folds -0.0
    // into 0.0 so they tie, as they do under `>` in the selector.
    scored.sort_by(|a, b| (b.relevance + 0.0).total_cmp(&(a.relevance + 0.0)));
    Ok(scored)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn score_all_agrees_with_score(
            query in proptest::collection::vec(-5.0f32..5.0, 8),
            candidates in proptest::collection::vec(proptest::collection::vec(-5.0f32..5.0, 8), 0..20),
        ) {
            let bulk = score_all(&query, &candidates).unwrap();
            prop_assert_eq!(bulk.len(), candidates.len());
            for (c, b) in candidates.iter().zip(&bulk) {
                prop_assert_eq!(score(&query, c).unwrap(), *b);
            }
        }

        #[test]
        fn mismatch_always_detected(dim_q in 1usize..16, dim_c in 1usize..16) {
            prop_assume!(dim_q != dim_c);
            let query = vec![1.0f32; dim_q];
            let candidates = vec![vec![1.0f32; dim_c]];
            let is_mismatch = matches!(
                score_all(&query, &candidates),
                Err(SelectError::DimensionMismatch { .. })
            );
            prop_assert!(is_mismatch);
        }
    }
}
