//! Text canonicalization
//!
//! This module provides the canonical text form used for cache-key derivation
//! and the lighter normalization applied at request intake. The canonical form
//! must be applied identically everywhere a key is derived, otherwise logically
//! equal requests would miss each other's cache entries.

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Canonical form for key derivation: whitespace-collapsed, surrounding
/// punctuation stripped per token, case-folded. Tokens that are pure
/// punctuation disappear entirely.
pub fn canonical(text: &str) -> String {
    let folded: Vec<String> = text
        .split_whitespace()
        .map(strip_surrounding_punctuation)
        .filter(|token| !token.is_empty())
        .map(case_fold)
        .collect();
    folded.join(" ")
}

/// Strip non-alphanumeric characters from both ends of a token, leaving
/// interior punctuation (hyphens, apostrophes, decimal points) untouched.
fn strip_surrounding_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn case_fold(token: &str) -> String {
    token.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  hello \t world\n"), "hello world");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_truncate_chars_on_boundary() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        // multi-byte characters are not split
        assert_eq!(truncate_chars("añejo", 2), "añ");
    }

    #[test]
    fn test_canonical_folds_case_and_punctuation() {
        assert_eq!(canonical("Hello, World!"), "hello world");
        assert_eq!(canonical("¿Cómo estás?"), "cómo estás");
        assert_eq!(canonical("  Hello   world.  "), "hello world");
    }

    #[test]
    fn test_canonical_keeps_interior_punctuation() {
        assert_eq!(canonical("it's 3.14"), "it's 3.14");
        assert_eq!(canonical("state-of-the-art"), "state-of-the-art");
    }

    #[test]
    fn test_canonical_drops_pure_punctuation_tokens() {
        assert_eq!(canonical("hello -- world"), "hello world");
        assert_eq!(canonical("!!!"), "");
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let once = canonical("  Hello,   WORLD!  ");
        assert_eq!(canonical(&once), once);
    }
}
