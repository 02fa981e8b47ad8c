//! Preference memory state machine
//!
//! Weighting of new observations, the decaying term store with its
//! short/long term tiers, and similarity-based retrieval.

pub mod history;
pub mod retrieval;
pub mod store;
pub mod types;
pub mod weight;

pub use history::InteractionHistory;
pub use retrieval::{RankedPreference, RelevanceRanker};
pub use store::{MemoryStore, ObserveOutcome};
pub use types::{MemorySnapshot, MemoryTier, PreferenceEntry};
pub use weight::WeightEngine;
