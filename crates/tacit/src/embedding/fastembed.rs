//! fastembed-backed term embeddings
//!
//! Embeds every term with a local sentence-embedding model. The model has an
//! answer for any input, so lookups never miss.

use std::sync::Mutex;

use fastembed::{EmbeddingModel as FastEmbedKind, InitOptions, TextEmbedding};

use super::EmbeddingModel;
use crate::error::{Result, TacitError};

/// Output dimension of all-MiniLM-L6-v2
pub const FASTEMBED_DIMENSION: usize = 384;

pub struct FastEmbedModel {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedModel {
    /// Load all-MiniLM-L6-v2 (downloaded on first use).
    pub fn new() -> Result<Self> {
        tracing::info!("Initializing fastembed model (this may take a moment on first run)...");
        let model = TextEmbedding::try_new(InitOptions::new(FastEmbedKind::AllMiniLML6V2))
            .map_err(|e| TacitError::Embedding(e.to_string()))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EmbeddingModel for FastEmbedModel {
    fn dimension(&self) -> usize {
        FASTEMBED_DIMENSION
    }

    fn lookup(&self, term: &str) -> Result<Option<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| TacitError::Embedding("Embedding model lock poisoned".to_string()))?;
        let embeddings = model
            .embed(vec![term.to_string()], None)
            .map_err(|e| TacitError::Embedding(e.to_string()))?;
        embeddings
            .into_iter()
            .next()
            .map(Some)
            .ok_or_else(|| TacitError::Embedding("No embedding returned".to_string()))
    }

    fn name(&self) -> &'static str {
        "fastembed"
    }
}
