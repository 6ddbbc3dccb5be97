//! PDF text extraction for uploads.
//!
//! Extraction is compiled in through the `pdf` cargo feature (on by default).
//! Whether it is available is decided once at startup ([`PdfSupport::detect`])
//! and carried in the server state, so a build without it still serves
//! queries and answers uploads with a clear error.
//!
//! Pages are extracted independently. The primary path is `pdf-extract`,
//! which produces the cleanest text; if it rejects the document, each page
//! is retried on its own through `lopdf` and pages that still fail are
//! skipped. Only a document `lopdf` cannot open at all is an error.

/// Accepted upload extension (compared case-insensitively).
pub const PDF_EXTENSION: &str = ".pdf";

/// Message returned for uploads whose filename is not a PDF.
pub const ONLY_PDF: &str = "Only PDF uploads are accepted.";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF extraction is not available on this server. Rebuild with `--features pdf` to enable uploads.")]
    Unavailable,

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Whether this build can extract PDF text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfSupport {
    Available,
    Unavailable,
}

impl PdfSupport {
    pub fn detect() -> Self {
        if cfg!(feature = "pdf") {
            PdfSupport::Available
        } else {
            PdfSupport::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        self == PdfSupport::Available
    }

    /// Extracts the document text, or fails with [`ExtractError::Unavailable`].
    pub fn extract(self, bytes: &[u8]) -> Result<String, ExtractError> {
        match self {
            PdfSupport::Available => extract_pdf_text(bytes),
            PdfSupport::Unavailable => Err(ExtractError::Unavailable),
        }
    }
}

/// True when `filename` ends in `.pdf`, ignoring case.
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(PDF_EXTENSION)
}

/// Extracts text from a PDF held in memory.
///
/// Non-blank pages are trimmed and joined with a blank line.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = extract_pages(bytes)?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(feature = "pdf")]
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    // pdf-extract panics on some malformed inputs
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "pdf-extract failed, extracting page by page");
            extract_pages_lenient(bytes)
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked, extracting page by page");
            extract_pages_lenient(bytes)
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn extract_pages(_bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    Err(ExtractError::Unavailable)
}

/// Per-page extraction that skips pages it cannot read.
#[cfg(feature = "pdf")]
fn extract_pages_lenient(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "skipping unreadable page");
            }
        }
    }
    Ok(pages)
}
