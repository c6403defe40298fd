//! Knowledge base types shared with the HTTP layer.

use serde::{Deserialize, Serialize};

/// Where the knowledge base is in its build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No build attempted yet.
    Uninitialized,
    /// A build is in flight.
    Building,
    /// The index is built and serving queries.
    Ready,
    /// The last build failed; the index is absent.
    Failed,
    /// Initialization is switched off by configuration.
    Disabled,
}

/// Aggregate statistics over the chunk set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_chunks: usize,
    /// Mean chunk length in characters.
    pub avg_chunk_length: f64,
    /// Sum of per-chunk token counts.
    pub total_words: usize,
}

/// Snapshot of the knowledge base for status endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseInfo {
    pub is_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<IndexStats>,
}

/// Prompt context for one request, with provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResult {
    pub context: String,
    pub sources: Vec<String>,
    pub has_knowledge_base: bool,
    pub has_uploaded_pdf: bool,
}
