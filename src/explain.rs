//! Explainability for MMR selection.
//!
//! Records why each candidate was picked: its relevance to the query, its
//! redundancy with earlier picks at the moment it was chosen, and the
//! resulting marginal score. Useful for debugging a λ choice and for
//! showing a reader why a given interaction made the cut.

use std::fmt;

use crate::diversity::{marginal_score, MmrConfig, MmrSelector, Selection};
use crate::similarity::{check_dimensions, score_all};
use crate::Result;

/// One pick of the greedy loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MmrStep {
    /// Original-order index of the picked candidate.
    pub index: usize,
    /// Cosine similarity to the query.
    pub relevance: f32,
    /// Highest similarity to earlier picks (0 for the first pick).
    pub redundancy: f32,
    /// `λ · relevance − (1 − λ) · redundancy` at pick time.
    pub score: f32,
}

/// How a selection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceMode {
    /// Cap covered every candidate; all indices kept in original order.
    PassThrough,
    /// Greedy MMR loop ran.
    Greedy,
}

/// Full provenance of a selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionTrace {
    /// Configuration the selection ran with.
    pub config: MmrConfig,
    /// Number of candidates considered.
    pub candidate_count: usize,
    /// Pass-through or greedy.
    pub mode: TraceMode,
    /// One entry per selected candidate, in pick order.
    pub steps: Vec<MmrStep>,
}

impl SelectionTrace {
    /// The selection this trace describes.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.steps.iter().map(|s| s.index).collect()
    }

    /// Render one line per pick, labelled with `labels[index]` where present.
    #[must_use]
    pub fn render<S: AsRef<str>>(&self, labels: &[S]) -> String {
        let mut out = format!(
            "{} of {} candidates ({:?}, λ={}, cap={})\n",
            self.steps.len(),
            self.candidate_count,
            self.mode,
            self.config.lambda,
            self.config.cap
        );
        for (rank, step) in self.steps.iter().enumerate() {
            let label = labels.get(step.index).map_or("", AsRef::as_ref);
            out.push_str(&format!(
                "{:>3}. #{:<4} rel={:.3} red={:.3} mmr={:.3} {}\n",
                rank + 1,
                step.index,
                step.relevance,
                step.redundancy,
                step.score,
                label
            ));
        }
        out
    }
}

impl fmt::Display for SelectionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render::<&str>(&[]))
    }
}

/// [`crate::diversity::select`] with per-pick provenance.
///
/// Produces the same indices in the same order as `select`. On the
/// pass-through path relevance is still computed so the trace has something
/// to show; redundancy is 0 for every step there.
///
/// # Errors
///
/// Same as [`crate::diversity::select`].
///
/// # Example
///
/// ```rust
/// use rank_select::diversity::MmrConfig;
/// use rank_select::explain::select_explained;
///
/// let query: [f32; 2] = [1.0, 0.0];
/// let candidates: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
/// let trace = select_explained(&query, &candidates, MmrConfig::new(0.7, 2)).unwrap();
///
/// assert_eq!(trace.steps[0].index, 0);
/// assert_eq!(trace.steps[0].redundancy, 0.0);
/// println!("{}", trace.render(&["opened app", "opened app again", "saved"]));
/// ```
pub fn select_explained<V>(
    query: &[f32],
    candidates: &[V],
    config: MmrConfig,
) -> Result<SelectionTrace>
where
    V: AsRef<[f32]> + Sync,
{
    config.validate()?;

    if candidates.len() <= config.cap {
        check_dimensions(query, candidates)?;
        let steps = score_all(query, candidates)?
            .into_iter()
            .enumerate()
            .map(|(index, relevance)| MmrStep {
                index,
                relevance,
                redundancy: 0.0,
                score: marginal_score(config.lambda, relevance, 0.0),
            })
            .collect();
        return Ok(SelectionTrace {
            config,
            candidate_count: candidates.len(),
            mode: TraceMode::PassThrough,
            steps,
        });
    }

    let mut selector = MmrSelector::new(query, candidates, config)?;
    let mut steps = Vec::with_capacity(config.cap);
    while let Some(step) = selector.next_step() {
        steps.push(step);
    }
    Ok(SelectionTrace {
        config,
        candidate_count: candidates.len(),
        mode: TraceMode::Greedy,
        steps,
    })
}
