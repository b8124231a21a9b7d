//! Client-side search matching for list pages.
//!
//! Matching ignores case and all whitespace, so `"b 1234 xy"` finds
//! `"B1234XY"`.

/// Fold `text` into its comparable form: whitespace removed, lowercased.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `haystack` contains `term` under [`normalize`].
///
/// A term that normalizes to nothing matches everything.
pub fn matches(haystack: &str, term: &str) -> bool {
    let needle = normalize(term);
    needle.is_empty() || normalize(haystack).contains(&needle)
}
