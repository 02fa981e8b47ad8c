//! Weight calculation for newly observed terms
//!
//! Each term of an observation gets a weight blending how dominant it is in
//! that observation with how surprising it is given the interaction history:
//!
//! `weight = alpha * (freq / len) + (1 - alpha) * novelty`
//!
//! where `novelty = 1 / ln(occurrences + 2)`. A term never seen before gets the
//! maximum novelty `1 / ln 2`; frequently seen terms approach 0.

use std::collections::HashMap;

use crate::config::WeightConfig;
use crate::memory::history::InteractionHistory;

/// Computes per-term weights for a single observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEngine {
    config: WeightConfig,
}

impl Default for WeightEngine {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}

impl WeightEngine {
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    pub fn alpha(&self) -> f32 {
        self.config.alpha
    }

    /// Compute the weight of every distinct term in `tokens`.
    ///
    /// `history` must not yet contain this observation. Empty input yields an
    /// empty map.
    pub fn compute_weights<S: AsRef<str>>(
        &self,
        tokens: &[S],
        history: &InteractionHistory,
    ) -> HashMap<String, f32> {
        if tokens.is_empty() {
            return HashMap::new();
        }

        let mut freq: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *freq.entry(token.as_ref()).or_insert(0) += 1;
        }

        let total = tokens.len() as f32;
        let alpha = self.config.alpha;

        freq.into_iter()
            .map(|(term, count)| {
                let novelty = novelty(history.occurrences(term));
                let weight = alpha * (count as f32 / total) + (1.0 - alpha) * novelty;
                (term.to_string(), weight)
            })
            .collect()
    }
}

/// Novelty of a term that appeared in `occurrences` past observations
#[inline]
pub fn novelty(occurrences: u64) -> f32 {
    1.0 / ((occurrences as f64 + 2.0).ln() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::LN_2;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_novelty_of_unseen_term_is_maximal() {
        assert_close(novelty(0), 1.0 / LN_2);
        assert!(novelty(0) > novelty(1));
        assert!(novelty(1) > novelty(100));
        assert!(novelty(1_000_000) > 0.0);
    }

    #[test]
    fn test_empty_tokens_yield_empty_weights() {
        let engine = WeightEngine::default();
        let empty: [&str; 0] = [];
        assert!(engine
            .compute_weights(&empty, &InteractionHistory::new())
            .is_empty());
    }

    #[test]
    fn test_weights_for_fresh_observation() {
        let engine = WeightEngine::default();
        let tokens = ["draw", "red", "box", "using", "tikz"];
        let weights = engine.compute_weights(&tokens, &InteractionHistory::new());

        assert_eq!(weights.len(), 5);
        let expected = 0.7 * (1.0 / 5.0) + 0.3 / LN_2;
        for token in tokens {
            assert_close(weights[token], expected);
        }
    }

    #[test]
    fn test_frequency_raises_weight() {
        let engine = WeightEngine::default();
        let weights =
            engine.compute_weights(&["box", "box", "box", "red"], &InteractionHistory::new());

        assert_eq!(weights.len(), 2);
        assert_close(weights["box"], 0.7 * 0.75 + 0.3 / LN_2);
        assert_close(weights["red"], 0.7 * 0.25 + 0.3 / LN_2);
        assert!(weights["box"] > weights["red"]);
    }

    #[test]
    fn test_history_lowers_weight() {
        let engine = WeightEngine::default();
        let mut history = InteractionHistory::new();
        history.record(&["draw", "red", "box", "using", "tikz"]);

        let weights = engine.compute_weights(&["add", "green", "box"], &history);
        let fresh = 0.7 / 3.0 + 0.3 / LN_2;
        let seen_once = 0.7 / 3.0 + 0.3 / 3.0_f32.ln();

        assert_close(weights["add"], fresh);
        assert_close(weights["green"], fresh);
        assert_close(weights["box"], seen_once);
    }

    #[test]
    fn test_alpha_is_configurable() {
        let engine = WeightEngine::new(WeightConfig { alpha: 1.0 });
        let weights = engine.compute_weights(&["box", "red"], &InteractionHistory::new());
        assert_close(weights["box"], 0.5);
        assert_eq!(engine.alpha(), 1.0);
    }
}
