//! # rank-select
//!
//! Pick a small, relevant, non-redundant subset of candidates using
//! Maximal Marginal Relevance over precomputed embeddings.
//!
//! ## Modules
//!
//! | Module | Purpose | Notes |
//! |--------|---------|-------|
//! | [`similarity`] | Cosine relevance of candidates to a query | Checked dimensions |
//! | [`diversity`] | Greedy MMR selection | Deterministic tie-break |
//! | [`explain`] | Per-pick provenance for a selection | |
//! | [`embedding`] | `Embedder` capability + validated batches | Trait-based, BYOM |
//! | [`query`] | Canonical "meaningful activity" query text | |
//! | [`pipeline`] | Candidate texts → summary subset | Logs via `tracing` |
//! | [`simd`] | Vector kernels (AVX2/NEON) | Auto-dispatch |
//!
//! ## Pipeline
//!
//! ```text
//! Extract (LLM) → Embed (external) → Select (this crate) → Narrate (LLM)
//!                                                  ↘ Report (full list)
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use rank_select::diversity::{select, MmrConfig};
//!
//! let query: [f32; 2] = [1.0, 0.0];
//! let candidates: Vec<Vec<f32>> = vec![
//!     vec![1.0, 0.0],
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//! ];
//!
//! let selection = select(&query, &candidates, MmrConfig::default().with_cap(2)).unwrap();
//! assert_eq!(selection.len(), 2);
//! assert_eq!(selection[0], 0); // most relevant goes first
//! ```

use std::error::Error as StdError;

pub mod diversity;
pub mod embedding;
pub mod explain;
pub mod pipeline;
pub mod query;
pub mod similarity;
pub mod simd;

/// Errors surfaced by scoring, selection and the embedding boundary.
///
/// Nothing in the core retries or logs; every fault reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// Two vectors that must be compared have different lengths.
    ///
    /// Signals a caller bug (mixed embedding models, stale cache), not a
    /// transient condition.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The selection cap must be at least one.
    #[error("invalid cap {cap}: must be at least 1")]
    InvalidCap { cap: usize },

    /// λ must be a finite value in `[0, 1]`.
    #[error("invalid relevance weight {lambda}: must be within [0, 1]")]
    InvalidRelevanceWeight { lambda: f32 },

    /// A non-empty result was required but there were no candidates.
    #[error("candidate set is empty")]
    EmptyCandidateSet,

    /// An embedding contained NaN or infinity.
    ///
    /// `vector` is the position in the embedder output (0 is the query when
    /// embedded through [`embedding::EmbeddedBatch`]).
    #[error("non-finite component {component} in vector {vector}")]
    NonFiniteComponent { vector: usize, component: usize },

    /// The embedder returned the wrong number of vectors.
    #[error("embedder returned {got} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, got: usize },

    /// The injected embedder failed.
    #[error("embedder failed: {0}")]
    Embedder(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Common imports.
pub mod prelude {
    pub use crate::diversity::{select, select_nonempty, MmrConfig, MmrSelector, Selection};
    pub use crate::embedding::{EmbeddedBatch, Embedder};
    pub use crate::explain::{select_explained, MmrStep, SelectionTrace};
    pub use crate::pipeline::{InteractionRanker, RankStrategy, RankedInteractions, RankerConfig};
    pub use crate::query::{ActivityQuery, FlowContext};
    pub use crate::similarity::{score, score_all, Candidate, ScoredCandidate};
    pub use crate::SelectError;
}
