//! Text extraction from document bytes.

use docsage_core::{Error, Result};
use tracing::debug;

/// Plain text pulled from a document, with its page count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// Turns raw document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract text. Malformed input is an [`Error::Extraction`].
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText>;
}

/// PDF extraction backed by `pdf-extract` (text) and `lopdf` (page count).
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        if !looks_like_pdf(bytes) {
            return Err(Error::Extraction("missing %PDF header".into()));
        }

        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| Error::Extraction(format!("invalid PDF: {e}")))?;
        let page_count = document.get_pages().len();

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        debug!("Extracted {} chars from {} PDF pages", text.len(), page_count);
        Ok(ExtractedText { text, page_count })
    }
}

/// Cheap signature check before handing bytes to the parsers.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes
        .windows(5)
        .take(1024)
        .any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfExtractor.extract(b"not a valid pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = PdfExtractor.extract(&[]).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let err = PdfExtractor.extract(b"%PDF-1.4\n1 0 obj << /Type /Catalog").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_signature_check() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(looks_like_pdf(b"\xEF\xBB\xBF%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04"));
    }
}
