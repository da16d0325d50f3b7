//! Token-set Jaccard similarity used for near-duplicate detection.
//!
//! Texts are split into lowercase words; words shorter than
//! [`MIN_TOKEN_CHARS`] are dropped, which removes most stop-words without a
//! word list. The score is `|A ∩ B| / |A ∪ B|` over the remaining unique words.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Shortest word that takes part in the comparison.
pub const MIN_TOKEN_CHARS: usize = 4;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\w+").unwrap());

fn token_set(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

/// Symmetric similarity in `[0, 1]`. Returns `0.0` when either side is empty
/// or has no qualifying words.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_tokens = token_set(a);
    let b_tokens = token_set(b);
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }
    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();
    intersection as f64 / union as f64
}
