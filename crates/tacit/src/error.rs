//! Error types for Tacit

use thiserror::Error;

/// Main error type for Tacit operations
#[derive(Error, Debug)]
pub enum TacitError {
    /// Persistence errors (state file, blob store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding model errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// An embedding did not have the dimension the lookup is configured for
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl From<serde_json::Error> for TacitError {
    fn from(e: serde_json::Error) -> Self {
        TacitError::Serialization(e.to_string())
    }
}

/// Result type alias for Tacit operations
pub type Result<T> = std::result::Result<T, TacitError>;
