//! Diversity-aware subset selection with Maximal Marginal Relevance.
//!
//! Pick at most `cap` candidates that are relevant to a query without
//! repeating each other. Each pick maximizes
//!
//! ```text
//! mmr(i) = λ · relevance(i) − (1 − λ) · redundancy(i)
//! ```
//!
//! where `relevance(i)` is the cosine similarity of candidate `i` to the
//! query and `redundancy(i)` is its highest cosine similarity to anything
//! already picked (0 before the first pick; negative when it points away
//! from every pick).
//!
//! # Lambda Guide
//!
//! | Value | Behavior |
//! |-------|----------|
//! | 1.0 | Pure relevance: top-`cap` by cosine, descending |
//! | 0.7 | Default: 70% relevance, 30% novelty |
//! | 0.0 | First pick by relevance, then maximal distance from prior picks |
//!
//! # Determinism
//!
//! Exact ties go to the smaller original index. The same query, candidates,
//! cap and λ always produce the same selection in the same order, with or
//! without the `parallel` feature.
//!
//! # Order
//!
//! A [`Selection`] is in pick order (most relevant/least redundant first),
//! not in original order. Use [`Selection::chronological`] when the
//! consumer wants the original flow order back. When there are no more
//! candidates than the cap, nothing is scored and the selection is every
//! index in original order.
//!
//! # Example
//!
//! ```rust
//! use rank_select::diversity::{select, MmrConfig};
//!
//! let query: [f32; 2] = [1.0, 0.0];
//! let candidates: Vec<Vec<f32>> = vec![
//!     vec![0.9, 0.3],
//!     vec![0.88, 0.32], // near-duplicate of 0
//!     vec![0.85, -0.3], // slightly less relevant, but different
//! ];
//!
//! let config = MmrConfig::default().with_lambda(0.5).with_cap(2);
//! let selection = select(&query, &candidates, config).unwrap();
//! assert_eq!(selection.indices(), &[0, 2]);
//! ```

use std::ops::Deref;

use crate::explain::MmrStep;
use crate::similarity::{check_dimensions, map_scores, score_all};
use crate::{simd, Result, SelectError};

/// Default relevance weight λ.
pub const DEFAULT_LAMBDA: f32 = 0.7;

/// Default maximum subset size.
pub const DEFAULT_CAP: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for MMR selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MmrConfig {
    /// Relevance weight λ in `[0, 1]`.
    /// - `λ=1.0`: pure relevance
    /// - `λ=0.0`: pure novelty after the first pick
    pub lambda: f32,
    /// Maximum number of candidates to select. Must be at least 1.
    pub cap: usize,
}

impl Default for MmrConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            cap: DEFAULT_CAP,
        }
    }
}

impl MmrConfig {
    /// Create config with custom lambda and cap.
    #[must_use]
    pub const fn new(lambda: f32, cap: usize) -> Self {
        Self { lambda, cap }
    }

    /// Set lambda (relevance-diversity tradeoff).
    #[must_use]
    pub const fn with_lambda(mut self, lambda: f32) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set cap (maximum subset size).
    #[must_use]
    pub const fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Reject configurations the selector cannot run with.
    ///
    /// # Errors
    ///
    /// - [`SelectError::InvalidCap`] if `cap == 0`
    /// - [`SelectError::InvalidRelevanceWeight`] if `lambda` is NaN or
    ///   outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if self.cap == 0 {
            return Err(SelectError::InvalidCap { cap: self.cap });
        }
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(SelectError::InvalidRelevanceWeight {
                lambda: self.lambda,
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered original-order indices chosen by the selector.
///
/// No duplicates, every index valid for the candidate set it came from,
/// length `min(cap, candidate_count)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Indices in pick order.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Consume into the pick-ordered indices.
    #[must_use]
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// The same indices re-sorted into original (chronological) order.
    #[must_use]
    pub fn chronological(&self) -> Vec<usize> {
        let mut sorted = self.indices.clone();
        sorted.sort_unstable();
        sorted
    }

    /// Slice a list parallel to the candidates, in pick order.
    ///
    /// Indices past the end of `items` are skipped.
    #[must_use]
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.indices.iter().filter_map(|&i| items.get(i)).collect()
    }

    fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }
}

impl Deref for Selection {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.indices
    }
}

impl From<Selection> for Vec<usize> {
    fn from(selection: Selection) -> Self {
        selection.indices
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Selection {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Greedy selector
// ─────────────────────────────────────────────────────────────────────────────

/// `λ · relevance − (1 − λ) · redundancy`.
#[inline]
pub(crate) fn marginal_score(lambda: f32, relevance: f32, redundancy: f32) -> f32 {
    lambda * relevance - (1.0 - lambda) * redundancy
}

/// Position in `remaining` of the best key; ties go to the earliest position.
///
/// `remaining` is kept ascending, so the earliest position is the smallest
/// original index.
#[inline]
fn argmax_first(remaining: &[usize], key: impl Fn(usize) -> f32) -> usize {
    let mut best_pos = 0;
    let mut best = key(remaining[0]);
    for (pos, &i) in remaining.iter().enumerate().skip(1) {
        let k = key(i);
        if k > best {
            best = k;
            best_pos = pos;
        }
    }
    best_pos
}

/// The greedy MMR loop, one pick per [`Iterator::next`].
///
/// Relevance is computed once, up front. Each candidate keeps a running
/// maximum of its similarity to the picks so far, seeded by its similarity
/// to the first pick; after a pick only the
/// similarity to the newest item is computed, so a full run costs
/// `O(cap × n)` cosine evaluations.
///
/// The first pick is always the most relevant candidate, whatever λ is.
/// For λ > 0 that is exactly what the formula picks (redundancy is 0); for
/// λ = 0 it keeps the first pick meaningful instead of index 0.
///
/// Unlike [`select`], the selector runs the loop even when the cap covers
/// every candidate.
///
/// ```rust
/// use rank_select::diversity::{MmrConfig, MmrSelector};
///
/// let query: [f32; 2] = [1.0, 0.0];
/// let candidates: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![0.7, 0.7], vec![0.0, 1.0]];
/// let mut selector = MmrSelector::new(&query, &candidates, MmrConfig::new(0.5, 2)).unwrap();
///
/// assert_eq!(selector.next(), Some(0));
/// // Candidate 1 is now partly redundant with candidate 0.
/// assert!(selector.redundancy(1).unwrap() > 0.7);
/// assert_eq!(selector.next(), Some(1));
/// assert_eq!(selector.next(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MmrSelector<'a, V> {
    candidates: &'a [V],
    lambda: f32,
    cap: usize,
    relevance: Vec<f32>,
    redundancy: Vec<f32>,
    remaining: Vec<usize>,
    selected: Vec<usize>,
}

impl<'a, V> MmrSelector<'a, V>
where
    V: AsRef<[f32]> + Sync,
{
    /// Validate inputs and score every candidate against `query`.
    ///
    /// # Errors
    ///
    /// - [`SelectError::InvalidCap`] / [`SelectError::InvalidRelevanceWeight`]
    ///   from [`MmrConfig::validate`], before any scoring
    /// - [`SelectError::DimensionMismatch`] if any vector disagrees with the
    ///   query's length
    pub fn new(query: &[f32], candidates: &'a [V], config: MmrConfig) -> Result<Self> {
        config.validate()?;
        let relevance = score_all(query, candidates)?;
        let n = candidates.len();
        Ok(Self {
            candidates,
            lambda: config.lambda,
            cap: config.cap,
            relevance,
            redundancy: vec![0.0; n],
            remaining: (0..n).collect(),
            selected: Vec::with_capacity(config.cap.min(n)),
        })
    }

    /// Relevance of candidate `index` to the query.
    #[must_use]
    pub fn relevance(&self, index: usize) -> Option<f32> {
        self.relevance.get(index).copied()
    }

    /// Current redundancy of candidate `index`: its highest similarity to
    /// the picks so far, 0 before the first pick. After the first pick it
    /// may be negative, and it never decreases with later picks.
    ///
    /// For an already-picked candidate this is the value it had when picked.
    #[must_use]
    pub fn redundancy(&self, index: usize) -> Option<f32> {
        self.redundancy.get(index).copied()
    }

    /// Candidates picked so far, in pick order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Candidates not yet picked, ascending.
    #[must_use]
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    /// `true` once the cap is reached or no candidates remain.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.selected.len() >= self.cap || self.remaining.is_empty()
    }

    /// Make the next pick and report how it scored.
    pub fn next_step(&mut self) -> Option<MmrStep> {
        if self.is_done() {
            return None;
        }

        let best_pos = if self.selected.is_empty() {
            argmax_first(&self.remaining, |i| self.relevance[i])
        } else {
            argmax_first(&self.remaining, |i| {
                marginal_score(self.lambda, self.relevance[i], self.redundancy[i])
            })
        };

        // `remove`, not `swap_remove`: the tie-break depends on ascending order.
        let index = self.remaining.remove(best_pos);
        self.selected.push(index);

        let step = MmrStep {
            index,
            relevance: self.relevance[index],
            redundancy: self.redundancy[index],
            score: marginal_score(self.lambda, self.relevance[index], self.redundancy[index]),
        };

        if !self.is_done() {
            self.absorb(index);
        }
        Some(step)
    }

    /// Fold the newest pick into every remaining candidate's redundancy.
    ///
    /// The first pick replaces the placeholder 0 outright, so similarity
    /// below zero is kept.
    fn absorb(&mut self, newest: usize) {
        let candidates = self.candidates;
        let first = self.selected.len() == 1;
        let newest = candidates[newest].as_ref();
        let sims = map_scores(&self.remaining, |&i| {
            simd::cosine(candidates[i].as_ref(), newest)
        });
        for (&i, sim) in self.remaining.iter().zip(sims) {
            if first || sim > self.redundancy[i] {
                self.redundancy[i] = sim;
            }
        }
    }
}

impl<V> Iterator for MmrSelector<'_, V>
where
    V: AsRef<[f32]> + Sync,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.next_step().map(|step| step.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self
            .cap
            .saturating_sub(self.selected.len())
            .min(self.remaining.len());
        (left, Some(left))
    }
}

impl<V> ExactSizeIterator for MmrSelector<'_, V> where V: AsRef<[f32]> + Sync {}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Select up to `config.cap` candidates balancing relevance to `query`
/// against redundancy with earlier picks.
///
/// Candidate positions are their original-order indices. If there are no
/// more candidates than the cap, every index is returned in original order
/// and nothing is scored (dimensions are still checked). An empty candidate
/// set yields an empty selection.
///
/// # Errors
///
/// - [`SelectError::InvalidCap`] / [`SelectError::InvalidRelevanceWeight`]
///   before any computation
/// - [`SelectError::DimensionMismatch`] if any vector disagrees with the
///   query's length
pub fn select<V>(query: &[f32], candidates: &[V], config: MmrConfig) -> Result<Selection>
where
    V: AsRef<[f32]> + Sync,
{
    config.validate()?;
    if candidates.len() <= config.cap {
        check_dimensions(query, candidates)?;
        return Ok(Selection::identity(candidates.len()));
    }
    Ok(MmrSelector::new(query, candidates, config)?.collect())
}

/// [`select`] for callers that require at least one pick.
///
/// # Errors
///
/// Everything [`select`] reports, plus [`SelectError::EmptyCandidateSet`]
/// when `candidates` is empty (checked after the config).
pub fn select_nonempty<V>(query: &[f32], candidates: &[V], config: MmrConfig) -> Result<Selection>
where
    V: AsRef<[f32]> + Sync,
{
    config.validate()?;
    if candidates.is_empty() {
        return Err(SelectError::EmptyCandidateSet);
    }
    select(query, candidates, config)
}

/// Reference implementation that recomputes redundancy against every pick
/// on every iteration: `O(cap² × n)` cosine evaluations.
///
/// Same contract and same output as [`select`]; kept for cross-checking and
/// benchmarking the incremental loop.
///
/// # Errors
///
/// Same as [`select`].
pub fn select_naive<V>(query: &[f32], candidates: &[V], config: MmrConfig) -> Result<Selection>
where
    V: AsRef<[f32]> + Sync,
{
    config.validate()?;
    if candidates.len() <= config.cap {
        check_dimensions(query, candidates)?;
        return Ok(Selection::identity(candidates.len()));
    }

    let relevance = score_all(query, candidates)?;
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut selected: Vec<usize> = Vec::with_capacity(config.cap);

    while selected.len() < config.cap && !remaining.is_empty() {
        let best_pos = if selected.is_empty() {
            argmax_first(&remaining, |i| relevance[i])
        } else {
            argmax_first(&remaining, |i| {
                let redundancy = selected
                    .iter()
                    .map(|&s| simd::cosine(candidates[i].as_ref(), candidates[s].as_ref()))
                    .fold(f32::NEG_INFINITY, f32::max);
                marginal_score(config.lambda, relevance[i], redundancy)
            })
        };
        selected.push(remaining.remove(best_pos));
    }

    Ok(Selection { indices: selected })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


// ─────────────────────────────────────────────────────────────────────────────
// Property Tests
// ─────────────────────────────────────────────────────────────────────────────
