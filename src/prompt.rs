//! Outbound prompt construction.
//!
//! The query is embedded verbatim; no escaping or injection filtering is
//! applied.

use crate::config::RetrievalConfig;
use crate::error::RelayError;
use crate::retrieval::select_context_with;

/// Header line placed before a non-empty context snippet.
pub const CONTEXT_HEADER: &str = "Context from program (relevant excerpts):";

/// Message returned for a blank or absent query.
pub const MISSING_QUERY: &str = "Missing query";

/// Composes the prompt sent upstream.
pub fn build_prompt(query: &str, context: &str) -> String {
    let mut prompt = String::new();
    if !context.is_empty() {
        prompt.push_str(CONTEXT_HEADER);
        prompt.push('\n');
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!(
        "Provide 3 concise, clear suggestions for someone pursuing a career as a {}. \
         List each suggestion on a new line with no extra text or numbering.",
        query
    ));
    prompt
}

/// Selects context from `document` (when one is loaded) and builds the prompt.
pub fn prompt_for(query: &str, document: &str, retrieval: &RetrievalConfig) -> String {
    let context = if document.is_empty() {
        String::new()
    } else {
        select_context_with(query, document, retrieval)
    };
    build_prompt(query, &context)
}

/// Trims the raw query, rejecting it when nothing is left.
pub fn validate_query(raw: &str) -> Result<&str, RelayError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(RelayError::Validation(MISSING_QUERY.to_string()));
    }
    Ok(query)
}
