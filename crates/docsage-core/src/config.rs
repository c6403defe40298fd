//! Configuration loaded once at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default characters per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap carried between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;
/// File name looked up in the working directory when no path is configured.
pub const DEFAULT_PDF_FILENAME: &str = "knowledge-base.pdf";

/// Which sentence/word segmentation strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// Unicode-aware sentence and word boundaries.
    #[default]
    Linguistic,
    /// Punctuation-run sentences and whitespace tokens.
    Naive,
}

impl FromStr for SegmenterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linguistic" => Ok(Self::Linguistic),
            "naive" => Ok(Self::Naive),
            other => Err(Error::Config(format!("unknown segmenter: {other}"))),
        }
    }
}

impl std::fmt::Display for SegmenterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmenterKind::Linguistic => write!(f, "linguistic"),
            SegmenterKind::Naive => write!(f, "naive"),
        }
    }
}

/// Knowledge base source and build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Path to the knowledge-base PDF.
    pub pdf_path: PathBuf,
    /// When set, the index is never built.
    pub disabled: bool,
    /// Soft upper bound on chunk length, in characters.
    pub chunk_size: usize,
    /// Maximum overlap seeded into the next chunk, in characters.
    pub chunk_overlap: usize,
    pub segmenter: SegmenterKind,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from(DEFAULT_PDF_FILENAME),
            disabled: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            segmenter: SegmenterKind::default(),
        }
    }
}

/// Top-level DocSage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSageConfig {
    /// HTTP server port.
    pub port: u16,
    pub knowledge_base: KnowledgeBaseConfig,
}

impl Default for DocSageConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            knowledge_base: KnowledgeBaseConfig::default(),
        }
    }
}

impl DocSageConfig {
    /// Create configuration from the process environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults; set but malformed values are
    /// reported as [`Error::Config`].
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

        let pdf_path = lookup("KNOWLEDGE_BASE_PDF_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::current_dir()
                    .map(|dir| dir.join(DEFAULT_PDF_FILENAME))
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_PDF_FILENAME))
            });

        let disabled = lookup("DISABLE_KNOWLEDGE_BASE").as_deref() == Some("true");

        let chunk_size = parse_var(&lookup, "KNOWLEDGE_BASE_CHUNK_SIZE")?.unwrap_or(DEFAULT_CHUNK_SIZE);
        let chunk_overlap =
            parse_var(&lookup, "KNOWLEDGE_BASE_CHUNK_OVERLAP")?.unwrap_or(DEFAULT_CHUNK_OVERLAP);
        if chunk_size == 0 {
            return Err(Error::Config("KNOWLEDGE_BASE_CHUNK_SIZE must be positive".into()));
        }
        // Otherwise the overlap seed can carry a whole flushed chunk forward.
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "KNOWLEDGE_BASE_CHUNK_OVERLAP ({chunk_overlap}) must be smaller than \
                 KNOWLEDGE_BASE_CHUNK_SIZE ({chunk_size})"
            )));
        }

        let segmenter = match lookup("DOCSAGE_SEGMENTER") {
            Some(raw) => raw.parse()?,
            None => SegmenterKind::default(),
        };

        Ok(Self {
            port,
            knowledge_base: KnowledgeBaseConfig {
                pdf_path,
                disabled,
                chunk_size,
                chunk_overlap,
                segmenter,
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid value for {key}: {raw:?}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DocSageConfig::from_vars(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.knowledge_base.disabled);
        assert_eq!(config.knowledge_base.chunk_size, 1000);
        assert_eq!(config.knowledge_base.chunk_overlap, 200);
        assert_eq!(config.knowledge_base.segmenter, SegmenterKind::Linguistic);
        assert!(config.knowledge_base.pdf_path.ends_with(DEFAULT_PDF_FILENAME));
    }

    #[test]
    fn test_overrides() {
        let config = DocSageConfig::from_vars(lookup(&[
            ("PORT", "8080"),
            ("KNOWLEDGE_BASE_PDF_PATH", "/srv/docs/handbook.pdf"),
            ("DISABLE_KNOWLEDGE_BASE", "true"),
            ("KNOWLEDGE_BASE_CHUNK_SIZE", "400"),
            ("KNOWLEDGE_BASE_CHUNK_OVERLAP", "50"),
            ("DOCSAGE_SEGMENTER", "Naive"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.knowledge_base.pdf_path, PathBuf::from("/srv/docs/handbook.pdf"));
        assert!(config.knowledge_base.disabled);
        assert_eq!(config.knowledge_base.chunk_size, 400);
        assert_eq!(config.knowledge_base.chunk_overlap, 50);
        assert_eq!(config.knowledge_base.segmenter, SegmenterKind::Naive);
    }

    #[test]
    fn test_disable_requires_literal_true() {
        let config = DocSageConfig::from_vars(lookup(&[("DISABLE_KNOWLEDGE_BASE", "1")])).unwrap();
        assert!(!config.knowledge_base.disabled);
    }

    #[test]
    fn test_malformed_values_are_config_errors() {
        let err = DocSageConfig::from_vars(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = DocSageConfig::from_vars(lookup(&[("DOCSAGE_SEGMENTER", "nltk")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err =
            DocSageConfig::from_vars(lookup(&[("KNOWLEDGE_BASE_CHUNK_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let err = DocSageConfig::from_vars(lookup(&[
            ("KNOWLEDGE_BASE_CHUNK_SIZE", "40"),
            ("KNOWLEDGE_BASE_CHUNK_OVERLAP", "400"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = DocSageConfig::from_vars(lookup(&[
            ("KNOWLEDGE_BASE_CHUNK_SIZE", "100"),
            ("KNOWLEDGE_BASE_CHUNK_OVERLAP", "100"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        // Overlap alone below the default size is fine.
        let config =
            DocSageConfig::from_vars(lookup(&[("KNOWLEDGE_BASE_CHUNK_OVERLAP", "999")])).unwrap();
        assert_eq!(config.knowledge_base.chunk_overlap, 999);
    }
}
