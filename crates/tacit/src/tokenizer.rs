//! Minimal fixed-rule tokenizer
//!
//! Turns raw interaction text into candidate preference terms. The rules are
//! intentionally fixed: lowercase, drop everything that is not a word
//! character or whitespace, split on whitespace, keep terms longer than two
//! characters.

/// Terms with this many characters or fewer are discarded
pub const MIN_TERM_EXCLUSIVE_LEN: usize = 2;

/// Split `text` into lowercase candidate terms.
///
/// Word characters are ASCII letters, digits and `_`. Empty or
/// punctuation-only input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.len() > MIN_TERM_EXCLUSIVE_LEN)
        .map(str::to_string)
        .collect()
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
