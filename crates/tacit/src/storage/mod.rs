//! Persistence of the memory state
//!
//! The store is persisted as one opaque blob: a JSON object mapping each term
//! to `{value, weight, embedding, lastSeen, tier}`. The interaction history
//! used for novelty is a second blob next to it. Loading is best effort: a
//! blob that cannot be decoded is logged and treated as empty.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::InMemoryStateStore;

use crate::error::Result;
use crate::memory::history::InteractionHistory;
use crate::memory::types::MemorySnapshot;

/// A blob store holding the serialized memory.
pub trait StateStore: Send {
    /// Read the last saved blob, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the saved blob
    fn save(&mut self, blob: &str) -> Result<()>;

    /// Read the last saved history blob, `None` if nothing was saved yet
    fn load_history(&self) -> Result<Option<String>>;

    /// Overwrite the saved history blob
    fn save_history(&mut self, blob: &str) -> Result<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;

    /// Load and decode the snapshot, recovering from malformed state with an
    /// empty memory.
    fn load_snapshot(&self) -> Result<MemorySnapshot> {
        match self.load()? {
            Some(blob) => Ok(decode_snapshot(&blob)),
            None => Ok(MemorySnapshot::new()),
        }
    }

    /// Encode and save a snapshot
    fn save_snapshot(&mut self, snapshot: &MemorySnapshot) -> Result<()> {
        let blob = encode_snapshot(snapshot)?;
        self.save(&blob)
    }

    /// Load the interaction history under `horizon`, empty if none was saved
    /// or it cannot be decoded.
    fn load_interactions(&self, horizon: Option<usize>) -> Result<InteractionHistory> {
        let persisted = match self.load_history()? {
            Some(blob) => decode_history(&blob),
            None => InteractionHistory::new(),
        };
        Ok(InteractionHistory::restore(persisted, horizon))
    }

    /// Encode and save the interaction history
    fn save_interactions(&mut self, history: &InteractionHistory) -> Result<()> {
        let blob = serde_json::to_string(history)?;
        self.save_history(&blob)
    }
}

/// Serialize a snapshot to its JSON blob
pub fn encode_snapshot(snapshot: &MemorySnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Decode a JSON blob, returning an empty snapshot if it is not a well-formed
/// term → entry object.
pub fn decode_snapshot(blob: &str) -> MemorySnapshot {
    if blob.trim().is_empty() {
        return MemorySnapshot::new();
    }
    match serde_json::from_str::<MemorySnapshot>(blob) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Discarding malformed memory state: {e}");
            MemorySnapshot::new()
        }
    }
}

/// Decode a history blob, returning an empty history if it is malformed
pub fn decode_history(blob: &str) -> InteractionHistory {
    if blob.trim().is_empty() {
        return InteractionHistory::new();
    }
    match serde_json::from_str::<InteractionHistory>(blob) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("Discarding malformed interaction history: {e}");
            InteractionHistory::new()
        }
    }
}
