//! Preference memory orchestration
//!
//! [`PreferenceMemory`] owns the term store, the interaction history and the
//! collaborators (embedding model, state store) and exposes the operations a
//! chat pipeline calls: learn from a response, fetch relevant preferences,
//! augment a prompt.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::augment::augment;
use crate::config::Config;
use crate::embedding::{EmbeddingLookup, EmbeddingModel};
use crate::error::Result;
use crate::memory::history::InteractionHistory;
use crate::memory::retrieval::{RankedPreference, RelevanceRanker};
use crate::memory::store::{MemoryStore, ObserveOutcome};
use crate::memory::types::{MemorySnapshot, PreferenceEntry};
use crate::memory::weight::WeightEngine;
use crate::storage::StateStore;
use crate::tokenizer::tokenize;

/// Adaptive preference memory.
///
/// Updates take `&mut self`, so observations are applied one at a time. To
/// share a memory across threads wrap it in `Arc<Mutex<_>>`.
pub struct PreferenceMemory {
    config: Config,
    store: MemoryStore,
    history: InteractionHistory,
    lookup: EmbeddingLookup,
    weights: WeightEngine,
    ranker: RelevanceRanker,
    state: Box<dyn StateStore>,
}

impl PreferenceMemory {
    /// Build a memory and hydrate it and its interaction history from `state`.
    ///
    /// Malformed persisted state yields an empty memory. Persisted embeddings
    /// whose dimension differs from the model's are rejected.
    pub fn open(
        config: Config,
        model: Arc<dyn EmbeddingModel>,
        state: Box<dyn StateStore>,
    ) -> Result<Self> {
        config.validate()?;
        let lookup = EmbeddingLookup::new(model);
        let snapshot = state.load_snapshot()?;
        let store = hydrate(snapshot, &config, &lookup)?;
        let history = state.load_interactions(config.memory.history_horizon)?;

        tracing::info!(
            entries = store.len(),
            observations = history.len(),
            model = lookup.model_name(),
            dimension = lookup.dimension(),
            state = state.name(),
            "Opened preference memory"
        );

        Ok(Self {
            history,
            weights: WeightEngine::new(config.weight),
            ranker: RelevanceRanker::new(config.retrieval),
            store,
            lookup,
            state,
            config,
        })
    }

    /// Learn from one interaction and persist the result.
    ///
    /// Tokenizes `text`, weighs the terms against the history, applies decay,
    /// reinforcement, promotion and eviction, then saves the store and the
    /// history.
    pub fn process_response(&mut self, text: &str, now: DateTime<Utc>) -> Result<ObserveOutcome> {
        let tokens = tokenize(text);
        let weights = self.weights.compute_weights(&tokens, &self.history);
        let outcome = self.store.observe(&tokens, &weights, now, &self.lookup)?;
        self.history.record(&tokens);

        tracing::debug!(
            tokens = tokens.len(),
            created = outcome.created.len(),
            reinforced = outcome.reinforced.len(),
            promoted = outcome.promoted.len(),
            evicted = outcome.evicted.len(),
            entries = self.store.len(),
            "Processed response"
        );

        self.save()?;
        Ok(outcome)
    }

    /// Preferences relevant to `query`, at most `retrieval.max_results`
    pub fn relevant_preferences(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<RankedPreference>> {
        self.ranker.rank(query, threshold, &self.store, &self.lookup)
    }

    /// Append the relevant preferences to `prompt` using the configured
    /// threshold. Returns the prompt unchanged when nothing matches.
    pub fn augment_prompt(&self, prompt: &str) -> Result<String> {
        let preferences = self
            .ranker
            .rank_default(prompt, &self.store, &self.lookup)?;
        Ok(augment(prompt, &preferences))
    }

    /// Remove a term from memory and persist, returning the removed entry
    pub fn forget(&mut self, term: &str) -> Result<Option<PreferenceEntry>> {
        let removed = self.store.remove(term);
        if removed.is_some() {
            tracing::info!(term, "Forgot preference");
            self.save()?;
        }
        Ok(removed)
    }

    /// Replace the in-memory store and history with the persisted state
    pub fn reload(&mut self) -> Result<()> {
        let snapshot = self.state.load_snapshot()?;
        self.store = hydrate(snapshot, &self.config, &self.lookup)?;
        self.history = self
            .state
            .load_interactions(self.config.memory.history_horizon)?;
        tracing::debug!(entries = self.store.len(), "Reloaded preference memory");
        Ok(())
    }

    /// Write the full store and the history to the state store
    pub fn save(&mut self) -> Result<()> {
        self.state.save_snapshot(&self.store.snapshot())?;
        self.state.save_interactions(&self.history)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn history(&self) -> &InteractionHistory {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lookup(&self) -> &EmbeddingLookup {
        &self.lookup
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.store.snapshot()
    }
}

fn hydrate(
    snapshot: MemorySnapshot,
    config: &Config,
    lookup: &EmbeddingLookup,
) -> Result<MemoryStore> {
    for (term, entry) in &snapshot {
        if let Err(e) = lookup.check_dimension(&entry.embedding) {
            tracing::error!(
                term = term.as_str(),
                "Persisted embedding does not match the embedding model"
            );
            return Err(e);
        }
    }
    Ok(MemoryStore::from_snapshot(snapshot, config.memory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::MemoryTier;
    use crate::storage::InMemoryStateStore;
    use crate::testing::fixture_model;

    fn open_with(state: InMemoryStateStore) -> PreferenceMemory {
        PreferenceMemory::open(Config::default(), Arc::new(fixture_model()), Box::new(state))
            .unwrap()
    }

    #[test]
    fn test_open_empty_state() {
        let memory = open_with(InMemoryStateStore::new());
        assert!(memory.store().is_empty());
        assert!(memory.history().is_empty());
        assert_eq!(memory.lookup().dimension(), 3);
    }

    #[test]
    fn test_open_malformed_state_recovers_empty() {
        let memory = open_with(InMemoryStateStore::with_blob("{\"box\": 12"));
        assert!(memory.store().is_empty());
    }

    #[test]
    fn test_open_rejects_foreign_dimension() {
        let blob = r#"{"box": {"value": "box", "weight": 1.0, "embedding": [0.1, 0.2],
                      "lastSeen": 1700000000000, "tier": "short-term"}}"#;
        let result = PreferenceMemory::open(
            Config::default(),
            Arc::new(fixture_model()),
            Box::new(InMemoryStateStore::with_blob(blob)),
        );
        assert!(matches!(
            result,
            Err(crate::TacitError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = Config::default();
        config.memory.decay_rate = 0.0;
        let result = PreferenceMemory::open(
            config,
            Arc::new(fixture_model()),
            Box::new(InMemoryStateStore::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_process_response_saves_every_update() {
        let state = InMemoryStateStore::new();
        let mut memory = open_with(state.clone());

        memory.process_response("Draw a red box", Utc::now()).unwrap();
        memory.process_response("", Utc::now()).unwrap();

        assert_eq!(state.save_count(), 2);
        assert_eq!(memory.history().len(), 2);
        assert!(state.load_snapshot().unwrap().contains_key("box"));
    }

    #[test]
    fn test_history_carries_over_reopen() {
        let state = InMemoryStateStore::new();
        {
            let mut memory = open_with(state.clone());
            memory.process_response("box", Utc::now()).unwrap();
        }

        let mut memory = open_with(state.clone());
        assert_eq!(memory.history().len(), 1);
        assert_eq!(memory.history().occurrences("box"), 1);

        memory.process_response("box", Utc::now()).unwrap();
        let weight = memory.store().get("box").unwrap().weight;
        let expected = (0.7 + 0.3 / 2.0_f32.ln()) * 0.95 + 0.7 + 0.3 / 3.0_f32.ln();
        assert!((weight - expected).abs() < 1e-5, "{weight} vs {expected}");
    }

    #[test]
    fn test_forget_removes_and_saves() {
        let state = InMemoryStateStore::new();
        let mut memory = open_with(state.clone());
        memory.process_response("Draw a red box", Utc::now()).unwrap();

        let removed = memory.forget("box").unwrap();
        assert_eq!(removed.map(|e| e.value), Some("box".to_string()));
        assert!(!state.load_snapshot().unwrap().contains_key("box"));
        assert_eq!(state.save_count(), 2);

        assert!(memory.forget("box").unwrap().is_none());
        assert_eq!(state.save_count(), 2);
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let state = InMemoryStateStore::new();
        let mut memory = open_with(state.clone());
        memory.process_response("Draw a red box", Utc::now()).unwrap();

        let mut other = open_with(state.clone());
        other.forget("red").unwrap();

        assert!(memory.store().contains("red"));
        memory.reload().unwrap();
        assert!(!memory.store().contains("red"));
        assert!(memory.store().contains("box"));
    }

    #[test]
    fn test_repeated_term_promotes() {
        let mut memory = open_with(InMemoryStateStore::new());
        let first = memory.process_response("tikz", Utc::now()).unwrap();
        assert!(first.promoted.is_empty());

        let second = memory.process_response("tikz", Utc::now()).unwrap();
        assert!(second.promoted.contains("tikz"));
        assert_eq!(memory.store().get("tikz").unwrap().tier, MemoryTier::LongTerm);
    }
}
