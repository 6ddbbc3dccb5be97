//! Token-overlap relevance selection.
//!
//! Picks the parts of the stored document most likely to ground an answer
//! to the user's query:
//!
//! 1. The document is split into line-aligned chunks ([`chunk_lines`]).
//! 2. Each chunk is scored by how many distinct query tokens it contains.
//! 3. The best chunks (score > 0, stable by document order on ties) are
//!    joined with a blank line and cut to the character budget.
//!
//! When nothing overlaps, the beginning of the document is returned instead,
//! so a loaded document always contributes some context.
//!
//! Tokens are whitespace-separated words, lowercased, longer than two
//! characters. Document tokens additionally lose surrounding punctuation
//! (see [`STRIP_CHARS`]); query tokens are taken as typed.

use std::collections::HashSet;

use crate::chunk::chunk_lines;
use crate::config::RetrievalConfig;
use crate::models::ScoredChunk;
use crate::text_util::truncate_chars;

/// Characters trimmed from both ends of document tokens before matching.
pub const STRIP_CHARS: &[char] = &['.', ',', ';', ':', '(', ')', '"', '\'', '`', '[', ']'];

/// Tokens must be longer than this many characters to count.
const MIN_TOKEN_CHARS: usize = 2;

/// Selects a context snippet for `query` from `text` using the default
/// chunk size (800) and chunk limit (3).
///
/// The result never exceeds `max_chars` characters.
pub fn select_context(query: &str, text: &str, max_chars: usize) -> String {
    let params = RetrievalConfig {
        max_chars,
        ..RetrievalConfig::default()
    };
    select_context_with(query, text, &params)
}

/// Like [`select_context`], with every retrieval parameter taken from `params`.
pub fn select_context_with(query: &str, text: &str, params: &RetrievalConfig) -> String {
    if text.is_empty() {
        return String::new();
    }

    let query_tokens = query_tokens(query);
    let scored = score_chunks(&query_tokens, text, params.chunk_size);

    let selected: Vec<&str> = scored
        .iter()
        .filter(|s| s.score > 0)
        .take(params.max_chunks)
        .map(|s| s.chunk.text.as_str())
        .collect();

    if selected.is_empty() {
        return truncate_chars(text, params.max_chars).to_string();
    }

    let joined = selected.join("\n\n");
    truncate_chars(&joined, params.max_chars).to_string()
}

/// Scores every chunk of `text` against `query_tokens`, best first.
///
/// Chunks with equal scores keep their document order.
pub fn score_chunks(query_tokens: &HashSet<String>, text: &str, chunk_size: usize) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunk_lines(text, chunk_size)
        .into_iter()
        .map(|chunk| {
            let score = document_tokens(&chunk.text)
                .intersection(query_tokens)
                .count();
            ScoredChunk { score, chunk }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Lowercased query words longer than two characters.
///
/// Length is measured before lowercasing, which can change the char count.
pub fn query_tokens(query: &str) -> HashSet<String> {
    query
        .split_whitespace()
        .filter(|t| is_long_enough(t))
        .map(str::to_lowercase)
        .collect()
}

/// Lowercased, punctuation-stripped document words longer than two characters.
pub fn document_tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase().trim_matches(STRIP_CHARS).to_string())
        .filter(|t| is_long_enough(t))
        .collect()
}

fn is_long_enough(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_util::char_len;

    fn params(chunk_size: usize, max_chars: usize) -> RetrievalConfig {
        RetrievalConfig {
            chunk_size,
            max_chars,
            max_chunks: 3,
        }
    }

    #[test]
    fn empty_text_yields_empty_context() {
        assert_eq!(select_context("anything at all", "", 1200), "");
    }

    #[test]
    fn query_token_length_is_checked_before_lowercasing() {
        // "İ" lowercases to two chars, so "İa" grows from 2 to 3
        assert!(query_tokens("İa").is_empty());
        assert!(query_tokens("İab").contains(&"İab".to_lowercase()));
    }

    #[test]
    fn query_tokens_are_lowercased_and_filtered() {
        let tokens = query_tokens("Machine  learning is AI Jobs jobs");
        let mut sorted: Vec<_> = tokens.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["jobs", "learning", "machine"]);
    }

    #[test]
    fn document_tokens_strip_surrounding_punctuation() {
        let tokens = document_tokens("(Python), \"Rust\"; [data]. `code` it's ab.");
        assert!(tokens.contains("python"));
        assert!(tokens.contains("rust"));
        assert!(tokens.contains("data"));
        assert!(tokens.contains("code"));
        assert!(tokens.contains("it's"));
        assert!(!tokens.contains("ab"));
        assert!(!tokens.contains("ab."));
    }

    #[test]
    fn selects_overlapping_line() {
        let text = "Python\n\nMachine learning\n\nCareer fair in April";
        let ctx = select_context("machine learning jobs", text, 1200);
        assert!(ctx.contains("Machine learning"));
        assert!(!ctx.is_empty());
        assert!(char_len(&ctx) <= 1200);
    }

    #[test]
    fn no_overlap_falls_back_to_document_prefix() {
        let text = "First line of the program.\nSecond line continues here.";
        let ctx = select_context("zzz qqq", text, 10);
        assert_eq!(ctx, "First line");
    }

    #[test]
    fn no_overlap_with_short_document_returns_it_whole() {
        let text = "Brief program overview.";
        assert_eq!(select_context("unrelated", text, 1200), text);
    }

    #[test]
    fn short_query_tokens_never_match() {
        // "ai" and "ml" are too short to count, so this is the fallback path
        let text = "ai\nml";
        assert_eq!(select_context("ai ml", text, 1200), text);
    }

    #[test]
    fn higher_scores_come_first() {
        let text = "nursing only here\n\nnursing and anatomy together";
        let ctx = select_context_with("nursing anatomy", text, &params(20, 1200));
        assert_eq!(ctx, "nursing and anatomy together\n\nnursing only here");
    }

    #[test]
    fn ties_keep_document_order() {
        let text = "alpha biology one\nfiller text\nbeta biology two";
        // chunk_size 20 puts each line in its own chunk
        let ctx = select_context_with("biology", text, &params(20, 1200));
        assert_eq!(ctx, "alpha biology one\n\nbeta biology two");
    }

    #[test]
    fn at_most_three_chunks_selected() {
        let text = (0..6)
            .map(|i| format!("chemistry line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let ctx = select_context_with("chemistry", &text, &params(20, 1200));
        assert_eq!(ctx.split("\n\n").count(), 3);
        assert!(ctx.starts_with("chemistry line 0"));
        assert!(ctx.ends_with("chemistry line 2"));
    }

    #[test]
    fn joined_context_is_truncated_mid_chunk() {
        let text = "physics first block\nphysics second block";
        let ctx = select_context_with("physics", text, &params(20, 25));
        assert_eq!(ctx, "physics first block\n\nphys");
    }

    #[test]
    fn output_never_exceeds_budget() {
        let text = "engineering ".repeat(500);
        for max_chars in [0, 1, 50, 1200] {
            let ctx = select_context("engineering", &text, max_chars);
            assert!(char_len(&ctx) <= max_chars);
            let ctx = select_context("nothing", &text, max_chars);
            assert!(char_len(&ctx) <= max_chars);
        }
    }

    #[test]
    fn scoring_counts_distinct_tokens() {
        let q = query_tokens("data science data");
        let scored = score_chunks(&q, "data data data science", 800);
        assert_eq!(scored[0].score, 2);
    }
}
