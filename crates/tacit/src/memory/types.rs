//! Memory types for the Tacit system
//!
//! A preference entry is a single learned term with its importance weight,
//! its (immutable) embedding and the tier it has reached.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single learned preference term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceEntry {
    /// The term itself
    pub value: String,
    /// Current importance weight
    pub weight: f32,
    /// Embedding captured when the entry was created
    pub embedding: Vec<f32>,
    /// Most recent reinforcement
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_seen: DateTime<Utc>,
    /// Retention tier
    #[serde(alias = "type")]
    pub tier: MemoryTier,
}

impl PreferenceEntry {
    /// Create a short-term entry for a newly observed term
    pub fn new(value: String, weight: f32, embedding: Vec<f32>, now: DateTime<Utc>) -> Self {
        Self {
            value,
            weight,
            embedding,
            last_seen: now,
            tier: MemoryTier::ShortTerm,
        }
    }

    pub fn is_long_term(&self) -> bool {
        self.tier == MemoryTier::LongTerm
    }
}

/// Retention tier of a preference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryTier {
    /// Recently learned, not yet reinforced past the promotion threshold
    ShortTerm,
    /// Reached the promotion threshold at least once
    LongTerm,
}

impl MemoryTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryTier::ShortTerm => "short-term",
            MemoryTier::LongTerm => "long-term",
        }
    }
}

impl fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" | "short-term" | "short_term" => Ok(MemoryTier::ShortTerm),
            "long" | "long-term" | "long_term" => Ok(MemoryTier::LongTerm),
            other => Err(format!(
                "Unknown tier: {other}. Use short-term or long-term."
            )),
        }
    }
}

/// Persisted form of the memory: term → entry, ordered by term
pub type MemorySnapshot = BTreeMap<String, PreferenceEntry>;
