//! One-shot CLI commands that run the query pipeline without the server.
//!
//! Useful for checking what context a PDF contributes to a query before
//! wiring up a front-end.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{ApiKey, Config};
use crate::error::MISSING_API_KEY;
use crate::extract::PdfSupport;
use crate::prompt::{prompt_for, validate_query};
use crate::retrieval::select_context_with;
use crate::text_util::char_len;
use crate::upstream::GeminiClient;

/// Reads and extracts a local PDF.
pub fn load_document(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read document: {}", path.display()))?;
    let text = PdfSupport::detect()
        .extract(&bytes)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;
    tracing::info!(path = %path.display(), chars = char_len(&text), "loaded document");
    Ok(text)
}

fn load_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => load_document(p),
        None => Ok(String::new()),
    }
}

/// `relay context`: prints the context snippet selected for `query`.
pub fn run_context(config: &Config, query: &str, document: &Path) -> Result<()> {
    let query = validate_query(query)?;
    let text = load_document(document)?;
    let context = select_context_with(query, &text, &config.retrieval);
    println!("{}", context);
    Ok(())
}

/// `relay prompt`: prints the prompt that would be sent upstream.
pub fn run_prompt(config: &Config, query: &str, document: Option<&Path>) -> Result<()> {
    let query = validate_query(query)?;
    let text = load_optional(document)?;
    println!("{}", prompt_for(query, &text, &config.retrieval));
    Ok(())
}

/// `relay ask`: sends the prompt upstream and prints the answer.
pub async fn run_ask(config: &Config, query: &str, document: Option<&Path>) -> Result<()> {
    let query = validate_query(query)?;
    let key = ApiKey::from_env().ok_or_else(|| anyhow::anyhow!(MISSING_API_KEY))?;
    let text = load_optional(document)?;

    let client = GeminiClient::new(&config.upstream, key)?;
    let answer = client.ask(&prompt_for(query, &text, &config.retrieval)).await?;
    println!("{}", answer);
    Ok(())
}
