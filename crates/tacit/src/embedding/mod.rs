//! Term embeddings
//!
//! The embedding model is an external collaborator: anything that maps a term
//! to a fixed-dimension vector can back the memory. [`EmbeddingLookup`] wraps a
//! model, substitutes the zero vector for terms the model does not know, and
//! rejects vectors of the wrong dimension.

#[cfg(feature = "fastembed")]
pub mod fastembed;
pub mod static_table;

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TacitError};

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedModel;
pub use static_table::StaticEmbeddings;

/// Default embedding dimension (GloVe-50 sized)
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 50;

/// A source of term embeddings.
///
/// Implementations must return vectors of exactly [`dimension`](Self::dimension)
/// elements. `Ok(None)` means the model has no entry for the term.
pub trait EmbeddingModel: Send + Sync {
    /// Length of every vector this model produces
    fn dimension(&self) -> usize;

    /// Look up the embedding for a single (already normalized) term
    fn lookup(&self, term: &str) -> Result<Option<Vec<f32>>>;

    /// Model name for logging
    fn name(&self) -> &'static str;
}

/// Embedding lookup with a zero-vector fallback for unknown terms.
#[derive(Clone)]
pub struct EmbeddingLookup {
    model: Arc<dyn EmbeddingModel>,
    dimension: usize,
}

impl EmbeddingLookup {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        let dimension = model.dimension();
        Self { model, dimension }
    }

    /// Dimension of every vector returned by [`embed`](Self::embed)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Embed a term.
    ///
    /// Terms the model does not know map to the zero vector, which has a
    /// cosine similarity of 0 with everything.
    ///
    /// # Errors
    /// Returns [`TacitError::DimensionMismatch`] if the model produced a vector
    /// of the wrong length, or propagates the model's own failure.
    pub fn embed(&self, term: &str) -> Result<Vec<f32>> {
        match self.model.lookup(term)? {
            Some(vector) => {
                if vector.len() != self.dimension {
                    return Err(TacitError::DimensionMismatch {
                        expected: self.dimension,
                        actual: vector.len(),
                    });
                }
                Ok(vector)
            }
            None => {
                tracing::trace!(term, "No embedding for term, using zero vector");
                Ok(vec![0.0; self.dimension])
            }
        }
    }

    /// Check that a stored embedding is comparable with this lookup's vectors
    pub fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(TacitError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for EmbeddingLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingLookup")
            .field("model", &self.model.name())
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Cosine similarity between two vectors.
///
/// Defined as 0 when either vector has zero norm, when the slices are empty,
/// or when their lengths differ. Callers comparing stored embeddings should
/// validate dimensions first (see [`EmbeddingLookup::check_dimension`]).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
