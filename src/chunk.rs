//! Line-boundary text chunker.
//!
//! Splits document text into [`Chunk`]s of at most `chunk_size` characters.
//! Splitting only ever happens between lines, so a single line longer than
//! the limit becomes its own oversized chunk rather than being cut.
//!
//! Blank lines are dropped and every kept line is trimmed. Chunk order
//! always follows line order.

use crate::models::Chunk;
use crate::text_util::char_len;

/// Split text into line-aligned chunks, respecting `chunk_size` (in chars).
/// Returns chunks with contiguous indices starting at 0; empty or
/// whitespace-only input yields no chunks.
pub fn chunk_lines(text: &str, chunk_size: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        let line_len = char_len(line);

        // +1 for the newline joining the line to the accumulator
        if current_len + line_len + 1 <= chunk_size {
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
        } else {
            if !current.is_empty() {
                chunks.push(make_chunk(chunks.len(), std::mem::take(&mut current)));
            }
            current.push_str(line);
            current_len = line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(make_chunk(chunks.len(), current));
    }

    chunks
}

fn make_chunk(index: usize, text: String) -> Chunk {
    Chunk { index, text }
}
