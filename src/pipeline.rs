//! Candidate texts in, summary subset out.
//!
//! [`InteractionRanker`] ties the pieces together: build the activity query,
//! embed query and candidates in one call, run MMR, and hand back indices
//! into the caller's list. The caller's list is never touched, so the full
//! record stays available for reporting.
//!
//! ```rust
//! use std::convert::Infallible;
//! use rank_select::pipeline::{InteractionRanker, RankStrategy, RankerConfig};
//!
//! let embedder = |texts: &[&str]| -> Result<Vec<Vec<f32>>, Infallible> {
//!     Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
//! };
//! let ranker = InteractionRanker::with_config(embedder, RankerConfig::default().with_cap(2));
//!
//! let texts = ["clicked", "typed name", "clicked"];
//! let ranked = ranker.rank(&texts, None).unwrap();
//! assert_eq!(ranked.strategy, RankStrategy::Mmr);
//! assert_eq!(ranked.pick(&texts).len(), 2);
//! ```

use tracing::{debug, info, warn};

use crate::diversity::{select, MmrConfig};
use crate::embedding::{EmbeddedBatch, Embedder};
use crate::query::{ActivityQuery, FlowContext};
use crate::Result;

/// Order of the selected indices handed to the narrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SummaryOrder {
    /// Pick order: most relevant first.
    #[default]
    Selection,
    /// Original extraction order.
    Chronological,
}

/// Ranker configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankerConfig {
    /// λ and cap.
    pub mmr: MmrConfig,
    /// Output order.
    pub order: SummaryOrder,
}

impl RankerConfig {
    /// Set the cap.
    #[must_use]
    pub const fn with_cap(mut self, cap: usize) -> Self {
        self.mmr = self.mmr.with_cap(cap);
        self
    }

    /// Set λ.
    #[must_use]
    pub const fn with_lambda(mut self, lambda: f32) -> Self {
        self.mmr = self.mmr.with_lambda(lambda);
        self
    }

    /// Set the output order.
    #[must_use]
    pub const fn with_order(mut self, order: SummaryOrder) -> Self {
        self.order = order;
        self
    }
}

/// How a ranking was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RankStrategy {
    /// At or under the cap; everything kept, no embedding done.
    PassThrough,
    /// Embedded and selected with MMR.
    Mmr,
    /// Embedding failed; first `cap` candidates kept.
    Truncated,
}

/// Result of ranking: indices into the caller's candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedInteractions {
    /// Selected indices, in the configured order.
    pub indices: Vec<usize>,
    /// How they were chosen.
    pub strategy: RankStrategy,
}

impl RankedInteractions {
    /// Slice any list parallel to the candidates.
    ///
    /// Indices past the end of `items` are skipped.
    #[must_use]
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.indices.iter().filter_map(|&i| items.get(i)).collect()
    }

    /// Number of selected candidates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when nothing was selected.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn leading(n: usize, strategy: RankStrategy) -> Self {
        Self {
            indices: (0..n).collect(),
            strategy,
        }
    }
}

/// Reduces a list of interaction descriptions to a capped, diverse subset.
#[derive(Debug, Clone)]
pub struct InteractionRanker<E> {
    embedder: E,
    config: RankerConfig,
}

impl<E: Embedder> InteractionRanker<E> {
    /// Ranker with the default configuration (λ = 0.7, cap = 50).
    pub fn new(embedder: E) -> Self {
        Self::with_config(embedder, RankerConfig::default())
    }

    /// Ranker with an explicit configuration.
    pub fn with_config(embedder: E, config: RankerConfig) -> Self {
        Self { embedder, config }
    }

    /// Current configuration.
    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// The wrapped embedder.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Rank `texts` against the activity query.
    ///
    /// At or under the cap every index is returned in original order and the
    /// embedder is not called.
    ///
    /// # Errors
    ///
    /// Invalid configuration, any embedding fault (see
    /// [`EmbeddedBatch::embed`]) or a selection error.
    pub fn rank<S: AsRef<str>>(
        &self,
        texts: &[S],
        context: Option<&FlowContext>,
    ) -> Result<RankedInteractions> {
        self.config.mmr.validate()?;
        if let Some(ranked) = self.pass_through(texts.len()) {
            return Ok(ranked);
        }
        let batch = self.embed(texts, context)?;
        self.select_from(&batch)
    }

    /// [`InteractionRanker::rank`], falling back to the first `cap` texts when
    /// embedding fails.
    ///
    /// Only faults at the embedding boundary fall back: backend errors and
    /// malformed embedder output. The fallback is logged at `warn`.
    ///
    /// # Errors
    ///
    /// Invalid configuration or a selection error.
    pub fn rank_or_truncate<S: AsRef<str>>(
        &self,
        texts: &[S],
        context: Option<&FlowContext>,
    ) -> Result<RankedInteractions> {
        self.config.mmr.validate()?;
        if let Some(ranked) = self.pass_through(texts.len()) {
            return Ok(ranked);
        }
        match self.embed(texts, context) {
            Ok(batch) => self.select_from(&batch),
            Err(e) => {
                warn!(
                    error = %e,
                    candidates = texts.len(),
                    cap = self.config.mmr.cap,
                    "embedding failed, keeping leading interactions"
                );
                Ok(RankedInteractions::leading(
                    self.config.mmr.cap,
                    RankStrategy::Truncated,
                ))
            }
        }
    }

    fn pass_through(&self, count: usize) -> Option<RankedInteractions> {
        (count <= self.config.mmr.cap).then(|| {
            debug!(
                candidates = count,
                cap = self.config.mmr.cap,
                "within cap, skipping ranking"
            );
            RankedInteractions::leading(count, RankStrategy::PassThrough)
        })
    }

    fn embed<S: AsRef<str>>(
        &self,
        texts: &[S],
        context: Option<&FlowContext>,
    ) -> Result<EmbeddedBatch> {
        let query = ActivityQuery::new().with_optional_context(context).text();
        debug!(
            candidates = texts.len(),
            query_len = query.len(),
            "embedding query and candidates"
        );
        EmbeddedBatch::embed(&self.embedder, &query, texts)
    }

    fn select_from(&self, batch: &EmbeddedBatch) -> Result<RankedInteractions> {
        let selection = select(&batch.query, &batch.candidates, self.config.mmr)?;
        info!(
            candidates = batch.len(),
            selected = selection.len(),
            dim = batch.dim(),
            lambda = self.config.mmr.lambda,
            "selected interactions"
        );
        let indices = match self.config.order {
            SummaryOrder::Selection => selection.into_indices(),
            SummaryOrder::Chronological => selection.chronological(),
        };
        Ok(RankedInteractions {
            indices,
            strategy: RankStrategy::Mmr,
        })
    }
}
