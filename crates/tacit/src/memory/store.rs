//! The decaying term store
//!
//! Every observation first decays all entries, then reinforces (or creates)
//! the entries for the observed terms. After each per-term update the entry is
//! promoted to long-term if it reached the promotion threshold and evicted if
//! it fell below the demote threshold. Tier and existence are independent: a
//! long-term entry is evicted like any other.

use std::collections::btree_map::Entry;
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::config::MemoryConfig;
use crate::embedding::EmbeddingLookup;
use crate::error::Result;
use crate::memory::types::{MemorySnapshot, MemoryTier, PreferenceEntry};

/// What a single [`MemoryStore::observe`] call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveOutcome {
    /// Terms that got a new entry
    pub created: BTreeSet<String>,
    /// Terms whose existing entry was reinforced
    pub reinforced: BTreeSet<String>,
    /// Terms promoted to long-term
    pub promoted: BTreeSet<String>,
    /// Terms removed for falling below the demote threshold
    pub evicted: BTreeSet<String>,
}

impl ObserveOutcome {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.reinforced.is_empty()
            && self.promoted.is_empty()
            && self.evicted.is_empty()
    }
}

/// Term → preference entry mapping with decay, promotion and eviction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: MemorySnapshot,
    config: MemoryConfig,
}

impl MemoryStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            entries: MemorySnapshot::new(),
            config,
        }
    }

    /// Hydrate a store from a persisted snapshot.
    ///
    /// Entries are keyed by the snapshot's keys; an entry whose `value`
    /// disagrees with its key is corrected to the key.
    pub fn from_snapshot(snapshot: MemorySnapshot, config: MemoryConfig) -> Self {
        let entries = snapshot
            .into_iter()
            .map(|(key, mut entry)| {
                if entry.value != key {
                    tracing::debug!(
                        key = key.as_str(),
                        value = entry.value.as_str(),
                        "Entry value differs from key"
                    );
                    entry.value = key.clone();
                }
                (key, entry)
            })
            .collect();
        Self { entries, config }
    }

    /// Apply one observation.
    ///
    /// `tokens` are processed in order, once per occurrence; `weights` holds
    /// the increment for each distinct term. All embeddings are resolved before
    /// the store is touched, so a lookup failure leaves it unchanged.
    pub fn observe<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        weights: &HashMap<String, f32>,
        now: DateTime<Utc>,
        lookup: &EmbeddingLookup,
    ) -> Result<ObserveOutcome> {
        let mut embeddings: HashMap<&str, Vec<f32>> = HashMap::new();
        for token in tokens {
            let term = token.as_ref();
            if !embeddings.contains_key(term) {
                embeddings.insert(term, lookup.embed(term)?);
            }
        }

        self.apply_decay();

        let mut outcome = ObserveOutcome::default();
        for token in tokens {
            let term = token.as_ref();
            let increment = weights.get(term).copied().unwrap_or(0.0);

            let entry = match self.entries.entry(term.to_string()) {
                Entry::Vacant(slot) => {
                    let embedding = embeddings.get(term).cloned().unwrap_or_default();
                    outcome.created.insert(term.to_string());
                    slot.insert(PreferenceEntry::new(
                        term.to_string(),
                        increment,
                        embedding,
                        now,
                    ))
                }
                Entry::Occupied(slot) => {
                    let entry = slot.into_mut();
                    entry.weight += increment;
                    entry.last_seen = now;
                    outcome.reinforced.insert(term.to_string());
                    entry
                }
            };

            if entry.weight >= self.config.promotion_threshold
                && entry.tier == MemoryTier::ShortTerm
            {
                entry.tier = MemoryTier::LongTerm;
                tracing::debug!(term, weight = entry.weight, "Promoted to long-term");
                outcome.promoted.insert(term.to_string());
            }

            let weight = entry.weight;
            if weight < self.config.demote_threshold {
                self.entries.remove(term);
                tracing::debug!(term, weight, "Evicted below demote threshold");
                outcome.evicted.insert(term.to_string());
            }
        }

        Ok(outcome)
    }

    fn apply_decay(&mut self) {
        let rate = self.config.decay_rate;
        for entry in self.entries.values_mut() {
            entry.weight *= rate;
        }
    }

    pub fn get(&self, term: &str) -> Option<&PreferenceEntry> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Remove an entry outright
    pub fn remove(&mut self, term: &str) -> Option<PreferenceEntry> {
        self.entries.remove(term)
    }

    /// Entries in term order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PreferenceEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_tier(&self, tier: MemoryTier) -> usize {
        self.entries.values().filter(|e| e.tier == tier).count()
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.entries.clone()
    }
}
