//! Shared application state.

use std::sync::Arc;

use docsage_core::DocSageConfig;
use docsage_ingest::{PdfExtractor, TextExtractor};
use docsage_knowledge::KnowledgeBase;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: DocSageConfig,
    pub knowledge_base: KnowledgeBase,
    /// Extractor for PDFs uploaded with a request.
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(config: DocSageConfig) -> Self {
        let knowledge_base = KnowledgeBase::from_config(&config.knowledge_base);
        Self::with_knowledge_base(config, knowledge_base)
    }

    /// State around an already constructed knowledge base.
    pub fn with_knowledge_base(config: DocSageConfig, knowledge_base: KnowledgeBase) -> Self {
        Self {
            config,
            knowledge_base,
            extractor: Arc::new(PdfExtractor),
        }
    }
}
