//! Character-based string helpers.
//!
//! Every length limit in the relay (chunk size, context budget, log excerpts)
//! counts Unicode scalar values rather than bytes, so slicing must go through
//! these helpers to avoid splitting a multi-byte character.

/// Number of `char`s in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
