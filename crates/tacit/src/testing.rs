//! Test utilities for tacit - fixture embeddings and mocks

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::embedding::{DEFAULT_EMBEDDING_DIMENSION, EmbeddingModel, StaticEmbeddings};
use crate::error::Result;

/// Reference vectors used throughout the examples and tests
pub fn fixture_vectors() -> HashMap<String, Vec<f32>> {
    HashMap::from([
        ("box".to_string(), vec![0.8, 0.1, 0.2]),
        ("rectangle".to_string(), vec![0.79, 0.12, 0.18]),
        ("tikz".to_string(), vec![0.5, 0.5, 0.1]),
    ])
}

/// Three-dimensional table knowing `box`, `rectangle` and `tikz`
pub fn fixture_model() -> StaticEmbeddings {
    StaticEmbeddings::with_dimension(fixture_vectors(), 3)
        .unwrap_or_else(|_| StaticEmbeddings::empty(3))
}

/// Mock embedding model for fast tests that need a vector for every term.
/// Produces deterministic vectors based on a hash of the term.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl Default for MockEmbeddingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingModel {
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_EMBEDDING_DIMENSION)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Deterministic pseudo-random vector in [-1, 1] for `text`
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        (0..self.dimension)
            .map(|i| {
                let x = seed
                    .wrapping_mul(i as u64 + 1)
                    .wrapping_add(0x9e3779b97f4a7c15);
                let normalized = (x as f32) / (u64::MAX as f32);
                (normalized * 2.0) - 1.0
            })
            .collect()
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, term: &str) -> Result<Option<Vec<f32>>> {
        Ok(Some(self.embed(term)))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_embedding_is_deterministic() {
        let model = MockEmbeddingModel::new();
        assert_eq!(model.embed("hello"), model.embed("hello"));
    }

    #[test]
    fn mock_embedding_has_configured_dimension() {
        assert_eq!(MockEmbeddingModel::new().embed("test").len(), 50);
        assert_eq!(MockEmbeddingModel::with_dimension(8).embed("test").len(), 8);
    }

    #[test]
    fn mock_embedding_values_in_range() {
        for val in MockEmbeddingModel::new().embed("test input") {
            assert!((-1.0..=1.0).contains(&val), "Value {val} out of range");
        }
    }

    #[test]
    fn mock_embedding_differs_between_inputs() {
        let model = MockEmbeddingModel::new();
        assert_ne!(model.embed("hello"), model.embed("world"));
    }

    #[test]
    fn fixture_model_knows_three_terms() {
        let model = fixture_model();
        assert_eq!(model.len(), 3);
        assert_eq!(model.dimension(), 3);
    }
}
