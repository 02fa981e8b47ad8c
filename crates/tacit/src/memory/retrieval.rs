//! Similarity retrieval with tier-first ranking
//!
//! Every (memory entry, query term) pair is scored by cosine similarity; pairs
//! at or above the threshold become candidates. Candidates are ordered
//! long-term first, then by `weight * similarity`, and truncated.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::config::RetrievalConfig;
use crate::embedding::{EmbeddingLookup, cosine_similarity};
use crate::error::Result;
use crate::memory::store::MemoryStore;
use crate::memory::types::MemoryTier;
use crate::tokenizer::tokenize;

/// A memory entry matched against a query term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPreference {
    /// Store key of the matched entry
    pub key: String,
    /// Stored value of the matched entry
    pub value: String,
    /// Entry weight at query time
    pub weight: f32,
    /// Cosine similarity with the matching query term
    pub similarity: f32,
    /// Entry tier at query time
    pub tier: MemoryTier,
}

impl RankedPreference {
    /// Ranking score within a tier
    pub fn score(&self) -> f32 {
        self.weight * self.similarity
    }
}

/// Ranks memory entries by relevance to a query.
#[derive(Debug, Clone, Default)]
pub struct RelevanceRanker {
    config: RetrievalConfig,
}

impl RelevanceRanker {
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// Rank with the configured default threshold
    pub fn rank_default(
        &self,
        query: &str,
        store: &MemoryStore,
        lookup: &EmbeddingLookup,
    ) -> Result<Vec<RankedPreference>> {
        self.rank(query, self.config.threshold, store, lookup)
    }

    /// Find the entries relevant to `query`.
    ///
    /// Returns at most `max_results` matches, all with similarity at or above
    /// `threshold`. Unless deduplication is enabled, an entry matching several
    /// query terms appears once per matching term. Ranking never mutates the
    /// store.
    ///
    /// # Errors
    /// Returns [`TacitError::DimensionMismatch`](crate::TacitError) if a stored
    /// embedding is not comparable with the lookup's vectors.
    pub fn rank(
        &self,
        query: &str,
        threshold: f32,
        store: &MemoryStore,
        lookup: &EmbeddingLookup,
    ) -> Result<Vec<RankedPreference>> {
        let tokens = tokenize(query);
        if tokens.is_empty() || store.is_empty() || self.config.max_results == 0 {
            return Ok(Vec::new());
        }

        let query_embeddings = tokens
            .iter()
            .map(|t| lookup.embed(t))
            .collect::<Result<Vec<_>>>()?;

        let mut candidates = Vec::new();
        for (key, entry) in store.iter() {
            lookup.check_dimension(&entry.embedding)?;
            for query_embedding in &query_embeddings {
                let similarity = cosine_similarity(query_embedding, &entry.embedding);
                if similarity >= threshold {
                    candidates.push(RankedPreference {
                        key: key.clone(),
                        value: entry.value.clone(),
                        weight: entry.weight,
                        similarity,
                        tier: entry.tier,
                    });
                }
            }
        }

        if self.config.deduplicate {
            candidates = keep_best_per_key(candidates);
        }

        candidates.sort_by(compare_ranked);
        candidates.truncate(self.config.max_results);

        tracing::debug!(
            query_terms = tokens.len(),
            matches = candidates.len(),
            threshold,
            "Ranked preferences"
        );

        Ok(candidates)
    }
}

/// Long-term before short-term, then descending `weight * similarity`
fn compare_ranked(a: &RankedPreference, b: &RankedPreference) -> Ordering {
    b.tier
        .cmp(&a.tier)
        .then_with(|| b.score().total_cmp(&a.score()))
}

/// Collapse candidates to one per key, keeping the highest similarity and the
/// position of the key's first candidate.
fn keep_best_per_key(candidates: Vec<RankedPreference>) -> Vec<RankedPreference> {
    let mut best: Vec<RankedPreference> = Vec::with_capacity(candidates.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match index.get(&candidate.key) {
            Some(&i) => {
                if candidate.similarity > best[i].similarity {
                    best[i] = candidate;
                }
            }
            None => {
                index.insert(candidate.key.clone(), best.len());
                best.push(candidate);
            }
        }
    }
    best
}
