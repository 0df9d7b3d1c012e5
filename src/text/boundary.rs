//! Case-insensitive whole-word matching.
//!
//! A surface form matches a sentence only when neither the character before
//! the match nor the character after it is a word character. Punctuation may
//! sit inside the surface form and around it: `"U.S."` matches in
//! `"the U.S. economy"`, but `"US"` never matches inside `"USA"` or `"bonus"`.
//!
//! Both sides are folded (NFC + lowercase) before comparison, so boundaries
//! are checked on the folded haystack. Lowercasing never turns a word
//! character into a non-word character, so the check is equivalent to one on
//! the original text.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Fold a string for case-insensitive comparison.
#[cfg(feature = "unicode-normalization")]
pub fn fold_case(value: &str) -> String {
    value.nfc().collect::<String>().to_lowercase()
}

/// Fold a string for case-insensitive comparison.
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Word characters are alphanumerics and underscore.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word, case-insensitive search of `needle` in `haystack`.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let needle = fold_case(needle.trim());
    if needle.is_empty() {
        return false;
    }
    contains_folded_word(&fold_case(haystack), &needle)
}

/// Whole-word search on already folded inputs.
///
/// Candidate positions are tried left to right, advancing one character after
/// each rejected candidate so overlapping occurrences are not skipped.
pub fn contains_folded_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();

        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));

        if before_ok && after_ok {
            return true;
        }

        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
