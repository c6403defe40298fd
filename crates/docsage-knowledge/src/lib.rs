//! Knowledge base: an in-memory index over one document with lexical
//! relevance ranking and prompt context assembly.
//!
//! The [`KnowledgeBase`] service owns the lifecycle. It is constructed once by
//! the application and cloned into whichever layer needs it.

pub mod context;
pub mod index;
pub mod search;
pub mod service;
pub mod types;

pub use context::{
    assemble_context, create_system_prompt, ContextSource, SOURCE_KNOWLEDGE_BASE,
    SOURCE_UPLOADED_PDF,
};
pub use docsage_ingest::DocumentChunk;
pub use index::KnowledgeBaseIndex;
pub use search::{rank_chunks, score_chunk, DEFAULT_MAX_RESULTS};
pub use service::KnowledgeBase;
pub use types::*;
