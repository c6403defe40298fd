//! Knowledge-base document loading: locator → bytes → text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::file::{ExtractedText, PdfExtractor, TextExtractor};
use docsage_core::{Error, Result};

/// Supplies the knowledge-base document text.
///
/// Called at most once per successful build; implementations may block.
pub trait DocumentSource: Send + Sync {
    fn load(&self) -> Result<ExtractedText>;

    /// Human-readable locator, used in logs.
    fn describe(&self) -> String;
}

/// A PDF file on disk.
pub struct PdfFileSource {
    path: PathBuf,
    extractor: Arc<dyn TextExtractor>,
}

impl PdfFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_extractor(path, Arc::new(PdfExtractor))
    }

    pub fn with_extractor(path: impl Into<PathBuf>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            path: path.into(),
            extractor,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for PdfFileSource {
    fn load(&self) -> Result<ExtractedText> {
        if !self.path.is_file() {
            return Err(Error::SourceNotFound(self.path.display().to_string()));
        }

        let bytes = std::fs::read(&self.path)?;
        info!("Read {} bytes from {}", bytes.len(), self.path.display());

        let extracted = self.extractor.extract(&bytes)?;
        info!(
            "Extracted {} pages ({} chars) from {}",
            extracted.page_count,
            extracted.text.len(),
            self.path.display()
        );
        Ok(extracted)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// SHA-256 hex digest of text.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
