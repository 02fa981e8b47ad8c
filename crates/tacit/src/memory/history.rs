//! Interaction history for novelty scoring
//!
//! Novelty only needs to know how many past observations contained a term, so
//! the history is kept as a per-term occurrence counter rather than the raw
//! token sequences. With a horizon configured, only the most recent
//! `horizon` observations are counted.
//!
//! The history is persisted next to the store so novelty carries over between
//! processes. The window of recent observations is only kept (and persisted)
//! while a horizon is configured.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

/// Occurrence counts of terms across past observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionHistory {
    #[serde(default)]
    occurrences: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "VecDeque::is_empty")]
    window: VecDeque<BTreeSet<String>>,
    #[serde(default)]
    horizon: Option<usize>,
    #[serde(default)]
    observations: u64,
}

impl InteractionHistory {
    /// Unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// History that forgets observations older than the last `horizon`.
    /// A horizon of `None` is unbounded.
    pub fn with_horizon(horizon: Option<usize>) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    /// Adopt a persisted history under the currently configured horizon.
    ///
    /// Shrinking the horizon expires the oldest windowed observations.
    /// Dropping the horizon keeps the counts as they are. Counts recorded
    /// without a horizon cannot be attributed to observations, so switching
    /// from unbounded to bounded starts the counts afresh.
    pub fn restore(mut persisted: Self, horizon: Option<usize>) -> Self {
        match (persisted.horizon, horizon) {
            (_, None) => {
                persisted.window.clear();
                persisted.horizon = None;
                persisted
            }
            (Some(_), Some(limit)) => {
                persisted.horizon = Some(limit);
                persisted.expire_beyond(limit);
                persisted
            }
            (None, Some(limit)) => {
                if !persisted.occurrences.is_empty() {
                    tracing::warn!(
                        horizon = limit,
                        "History was recorded without a horizon; restarting novelty counts"
                    );
                }
                Self {
                    observations: persisted.observations,
                    ..Self::with_horizon(Some(limit))
                }
            }
        }
    }

    /// Number of recorded observations containing `term` at least once
    pub fn occurrences(&self, term: &str) -> u64 {
        self.occurrences.get(term).copied().unwrap_or(0)
    }

    /// Append one observation's tokens
    pub fn record<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let distinct: BTreeSet<String> =
            tokens.iter().map(|t| t.as_ref().to_string()).collect();
        for term in &distinct {
            *self.occurrences.entry(term.clone()).or_insert(0) += 1;
        }
        self.observations += 1;

        let Some(horizon) = self.horizon else {
            return;
        };
        self.window.push_back(distinct);
        self.expire_beyond(horizon);
    }

    fn expire_beyond(&mut self, horizon: usize) {
        while self.window.len() > horizon {
            if let Some(expired) = self.window.pop_front() {
                self.forget(&expired);
            }
        }
    }

    fn forget(&mut self, terms: &BTreeSet<String>) {
        for term in terms {
            if let Some(count) = self.occurrences.get_mut(term) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.occurrences.remove(term);
                }
            }
        }
    }

    /// Total observations recorded, including ones beyond the horizon
    pub fn len(&self) -> u64 {
        self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    pub fn clear(&mut self) {
        self.occurrences.clear();
        self.window.clear();
        self.observations = 0;
    }
}
