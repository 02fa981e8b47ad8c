//! In-process state store, for tests and ephemeral sessions

use std::sync::{Arc, Mutex};

use super::StateStore;
use crate::error::{Result, TacitError};

/// Keeps the blob in memory. Clones share the same slot, so a test can hand
/// one clone to the memory and inspect what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    blob: Arc<Mutex<Option<String>>>,
    history: Arc<Mutex<Option<String>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
            history: Arc::default(),
            saves: Arc::default(),
        }
    }

    /// Number of completed snapshot saves
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> Result<Option<String>> {
        self.blob
            .lock()
            .map(|b| b.clone())
            .map_err(|_| TacitError::Storage("State lock poisoned".to_string()))
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        let mut slot = self
            .blob
            .lock()
            .map_err(|_| TacitError::Storage("State lock poisoned".to_string()))?;
        *slot = Some(blob.to_string());
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }

    fn load_history(&self) -> Result<Option<String>> {
        self.history
            .lock()
            .map(|b| b.clone())
            .map_err(|_| TacitError::Storage("History lock poisoned".to_string()))
    }

    fn save_history(&mut self, blob: &str) -> Result<()> {
        let mut slot = self
            .history
            .lock()
            .map_err(|_| TacitError::Storage("History lock poisoned".to_string()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
