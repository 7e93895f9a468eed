//! The embedding boundary.
//!
//! Producing vectors from text (a hosted API, a local model, a cache) is not
//! this crate's job. Implement [`Embedder`] for your backend, or pass a
//! closure, and [`EmbeddedBatch`] checks what comes back before anything is
//! scored.
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use rank_select::embedding::EmbeddedBatch;
//!
//! // Toy embedder: text length and vowel count.
//! let embedder = |texts: &[&str]| -> Result<Vec<Vec<f32>>, Infallible> {
//!     Ok(texts
//!         .iter()
//!         .map(|t| {
//!             let vowels = t.chars().filter(|c| "aeiou".contains(*c)).count();
//!             vec![t.len() as f32, vowels as f32]
//!         })
//!         .collect())
//! };
//!
//! let batch = EmbeddedBatch::embed(&embedder, "saved", &["opened app", "saved file"]).unwrap();
//! assert_eq!(batch.len(), 2);
//! assert_eq!(batch.dim(), 2);
//! ```

use std::error::Error as StdError;

use crate::{Result, SelectError};

// ─────────────────────────────────────────────────────────────────────────────
// Capability
// ─────────────────────────────────────────────────────────────────────────────

/// Turns texts into embedding vectors.
///
/// Implementations must return exactly one vector per input text, in input
/// order, all of one dimensionality. [`EmbeddedBatch::embed`] verifies this,
/// so a misbehaving backend surfaces as a [`SelectError`] rather than a bad
/// selection.
pub trait Embedder {
    /// Backend failure type.
    type Error: StdError + Send + Sync + 'static;

    /// Embed a batch of texts.
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, Self::Error>;
}

impl<F, E> Embedder for F
where
    F: Fn(&[&str]) -> std::result::Result<Vec<Vec<f32>>, E>,
    E: StdError + Send + Sync + 'static,
{
    type Error = E;

    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, E> {
        self(texts)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validated batch
// ─────────────────────────────────────────────────────────────────────────────

/// A query embedding and candidate embeddings from a single embedder call.
///
/// # Invariants
///
/// - `candidates.len()` equals the number of candidate texts embedded
/// - every vector has the query's dimensionality
/// - every component is finite
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedBatch {
    /// Embedding of the query text.
    pub query: Vec<f32>,
    /// One embedding per candidate text, in input order.
    pub candidates: Vec<Vec<f32>>,
}

impl EmbeddedBatch {
    /// Embed `query` and `texts` together, query first, in one call.
    ///
    /// One call keeps query and candidates in the same embedding space even
    /// when the backend is versioned per request.
    ///
    /// # Errors
    ///
    /// - [`SelectError::Embedder`] if the backend fails
    /// - [`SelectError::EmbeddingCount`] if it returns the wrong number of vectors
    /// - [`SelectError::DimensionMismatch`] if a vector's length differs from the query's
    /// - [`SelectError::NonFiniteComponent`] if any component is NaN or infinite
    pub fn embed<E, S>(embedder: &E, query: &str, texts: &[S]) -> Result<Self>
    where
        E: Embedder + ?Sized,
        S: AsRef<str>,
    {
        let mut inputs: Vec<&str> = Vec::with_capacity(texts.len() + 1);
        inputs.push(query);
        inputs.extend(texts.iter().map(AsRef::as_ref));

        let vectors = embedder
            .embed(&inputs)
            .map_err(|e| SelectError::Embedder(Box::new(e)))?;
        Self::from_vectors(inputs.len(), vectors)
    }

    /// Validate raw embedder output, query first.
    ///
    /// `expected` counts the query plus every candidate.
    ///
    /// # Errors
    ///
    /// As [`EmbeddedBatch::embed`], minus the backend failure.
    pub fn from_vectors(expected: usize, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if vectors.len() != expected {
            return Err(SelectError::EmbeddingCount {
                expected,
                got: vectors.len(),
            });
        }

        let mut vectors = vectors.into_iter();
        let Some(query) = vectors.next() else {
            return Err(SelectError::EmbeddingCount { expected, got: 0 });
        };
        let candidates: Vec<Vec<f32>> = vectors.collect();

        let dim = query.len();
        for (position, v) in std::iter::once(&query).chain(&candidates).enumerate() {
            if v.len() != dim {
                return Err(SelectError::DimensionMismatch {
                    expected: dim,
                    got: v.len(),
                });
            }
            if let Some(component) = v.iter().position(|x| !x.is_finite()) {
                return Err(SelectError::NonFiniteComponent {
                    vector: position,
                    component,
                });
            }
        }

        Ok(Self { query, candidates })
    }

    /// Number of candidate embeddings.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when there are no candidates.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Shared dimensionality.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.query.len()
    }
}
