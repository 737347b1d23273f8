//! Resume document handling: base64 transport decoding and PDF text extraction.
//!
//! PDF structure is validated with `lopdf` (which also gives the page count)
//! before `pdf-extract` walks the pages. Extraction runs on the blocking pool;
//! a panic inside the extractor is reported as a parse failure.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers tolerate junk (a BOM, mail headers) before the header within this window.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid base64 resume: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid PDF resume: {0}")]
    Parse(String),
}

/// Decodes the transported resume. Accepts a `data:...;base64,` prefix and
/// line-wrapped payloads.
pub fn decode_resume(encoded: &str) -> Result<Vec<u8>, DocumentError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(compact)?)
}

/// Offset of the `%PDF-` header, if it starts within the search window.
fn find_pdf_header(bytes: &[u8]) -> Option<usize> {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW + PDF_MAGIC.len())];
    window.windows(PDF_MAGIC.len()).position(|w| w == PDF_MAGIC)
}

/// Extracts the text of every page, in page order.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let start = find_pdf_header(bytes).ok_or_else(|| {
        DocumentError::Parse("payload is not a PDF document".to_string())
    })?;
    if start > 0 {
        debug!(skipped = start, "Skipping bytes before PDF header");
    }
    let bytes = &bytes[start..];

    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;
    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(DocumentError::Parse("document has no pages".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DocumentError::Parse(format!("text extraction failed: {e}")))?;

    debug!(page_count, text_len = text.len(), "Extracted resume text");
    Ok(text)
}

/// Decodes the transported resume and extracts its text off the async workers.
pub async fn extract_resume_text(encoded: &str) -> Result<String, DocumentError> {
    let bytes = decode_resume(encoded)?;
    debug!(bytes = bytes.len(), "Decoded resume payload");

    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| DocumentError::Parse(format!("PDF extraction aborted: {e}")))?
}
