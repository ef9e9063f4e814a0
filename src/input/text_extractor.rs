//! Text extraction from plain text and PDF documents

use crate::error::{Result, ResumeAtsError};
use crate::input::file_detector::MediaType;
use log::debug;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        ensure_not_empty(bytes)?;

        let owned = bytes.to_vec();
        // pdf-extract is synchronous and can panic on malformed input.
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&owned)
        })
        .await
        .map_err(|e| ResumeAtsError::Extraction(format!("PDF decoder crashed: {}", e)))?
        .map_err(|e| ResumeAtsError::Extraction(format!("Failed to parse PDF: {}", e)))?;

        debug!("Extracted {} PDF pages", pages.len());
        Ok(join_pages(&pages))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        ensure_not_empty(bytes)?;

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ResumeAtsError::Extraction(format!("Unsupported text encoding (expected UTF-8): {}", e))
        })
    }
}

/// Extract text from bytes of a declared media type.
pub async fn extract_bytes(bytes: &[u8], media_type: MediaType) -> Result<String> {
    match media_type {
        MediaType::PlainText => PlainTextExtractor.extract(bytes).await,
        MediaType::Pdf => PdfExtractor.extract(bytes).await,
    }
}

/// Like [`extract_bytes`] but for a MIME string coming from an upload.
pub async fn extract_with_mime(bytes: &[u8], mime: &str) -> Result<String> {
    let media_type = MediaType::from_mime(mime).ok_or_else(|| {
        ResumeAtsError::UnsupportedFormat(format!(
            "{} (only text/plain and application/pdf are accepted)",
            mime
        ))
    })?;
    extract_bytes(bytes, media_type).await
}

/// Runs within a page are the non-empty lines the PDF decoder emits.
/// They are joined with single spaces; pages are joined with newlines.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| {
            page.lines()
                .map(str::trim)
                .filter(|run| !run.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ensure_not_empty(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(ResumeAtsError::Extraction("The document is empty".to_string()));
    }
    Ok(())
}
