//! Core data types that flow through the retrieval pipeline.

/// A line-aligned excerpt of the stored document.
///
/// Chunks are derived on every query and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in document order, starting at 0.
    pub index: usize,
    /// Trimmed, non-blank lines joined by `\n`.
    pub text: String,
}

/// A chunk paired with its token-overlap score against a query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub score: usize,
    pub chunk: Chunk,
}
