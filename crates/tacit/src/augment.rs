//! Prompt augmentation
//!
//! Appends ranked preferences to a prompt as a single annotation line:
//!
//! ```text
//! Create a box diagram
//! [Preferences: box=box, rectangle=rectangle]
//! ```

use crate::memory::retrieval::RankedPreference;

/// Format ranked preferences as `key=value` pairs in ranked order
pub fn format_preferences(preferences: &[RankedPreference]) -> String {
    preferences
        .iter()
        .map(|p| format!("{}={}", p.key, p.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append the preference annotation to `prompt`.
///
/// Returns the prompt unchanged when there is nothing to inject.
pub fn augment(prompt: &str, preferences: &[RankedPreference]) -> String {
    if preferences.is_empty() {
        return prompt.to_string();
    }
    format!("{prompt}\n[Preferences: {}]", format_preferences(preferences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::MemoryTier;

    fn pref(key: &str) -> RankedPreference {
        RankedPreference {
            key: key.to_string(),
            value: key.to_string(),
            weight: 1.0,
            similarity: 0.9,
            tier: MemoryTier::ShortTerm,
        }
    }

    #[test]
    fn test_augment_without_preferences_is_identity() {
        assert_eq!(augment("Create a box diagram", &[]), "Create a box diagram");
        assert_eq!(augment("", &[]), "");
    }

    #[test]
    fn test_augment_appends_annotation() {
        let prefs = vec![pref("box"), pref("rectangle")];
        assert_eq!(
            augment("Create a box diagram", &prefs),
            "Create a box diagram\n[Preferences: box=box, rectangle=rectangle]"
        );
    }

    #[test]
    fn test_format_preserves_order_and_duplicates() {
        let prefs = vec![pref("tikz"), pref("box"), pref("tikz")];
        assert_eq!(format_preferences(&prefs), "tikz=tikz, box=box, tikz=tikz");
    }
}
