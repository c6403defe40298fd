//! The knowledge base index: enriched chunks plus document-level summary and keywords.
//!
//! An index is built in one pass and never mutated afterwards, so a shared
//! `Arc<KnowledgeBaseIndex>` is safe for any number of concurrent readers.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::search::rank_chunks;
use crate::types::IndexStats;
use docsage_ingest::{
    content_hash, extract_keywords, generate_summary, Chunker, DocumentChunk, Segmenter,
    SummaryLimits, TfIdfModel,
};

#[derive(Debug, Clone)]
pub struct KnowledgeBaseIndex {
    chunks: Vec<DocumentChunk>,
    summary: String,
    keywords: Vec<String>,
    stats: IndexStats,
    source_hash: String,
    built_at: DateTime<Utc>,
}

impl KnowledgeBaseIndex {
    /// Chunk and enrich a whole document.
    ///
    /// Empty text is valid and yields an empty index.
    pub fn build(text: &str, chunker: &Chunker, segmenter: &dyn Segmenter) -> Self {
        let chunks = chunker.chunk(text, segmenter);
        debug!(
            "Chunked {} chars into {} chunks (max {}, overlap {})",
            text.len(),
            chunks.len(),
            chunker.max_chunk_chars,
            chunker.overlap_chars
        );
        Self::assemble(text, chunks, segmenter)
    }

    /// Build an index from pre-split chunk texts, in order.
    ///
    /// Document-level summary and keywords are computed over the chunk texts
    /// joined by a space.
    pub fn from_chunks<I, S>(texts: I, segmenter: &dyn Segmenter) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks: Vec<DocumentChunk> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| DocumentChunk::new(i, text))
            .collect();
        let full_text = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self::assemble(&full_text, chunks, segmenter)
    }

    fn assemble(text: &str, mut chunks: Vec<DocumentChunk>, segmenter: &dyn Segmenter) -> Self {
        let summary = generate_summary(text, segmenter, SummaryLimits::DOCUMENT);
        let keywords = extract_keywords(text, segmenter);

        let tfidf = TfIdfModel::from_texts(chunks.iter().map(|c| c.text.as_str()), segmenter);

        let mut total_chars = 0usize;
        let mut total_words = 0usize;
        for (i, chunk) in chunks.iter_mut().enumerate() {
            chunk.keywords = Some(extract_keywords(&chunk.text, segmenter));
            chunk.summary = Some(generate_summary(&chunk.text, segmenter, SummaryLimits::CHUNK));
            chunk.tfidf_score = Some(tfidf.average_score(i));

            total_chars += chunk.text.chars().count();
            total_words += segmenter.tokenize(&chunk.text).len();
        }

        let stats = IndexStats {
            total_chunks: chunks.len(),
            avg_chunk_length: if chunks.is_empty() {
                0.0
            } else {
                total_chars as f64 / chunks.len() as f64
            },
            total_words,
        };

        Self {
            chunks,
            summary,
            keywords,
            stats,
            source_hash: content_hash(text),
            built_at: Utc::now(),
        }
    }

    /// Chunks in document order.
    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Whole-document extractive summary (possibly empty).
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whole-document keywords, most frequent first.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// SHA-256 of the text the index was built from.
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Rank chunks against a query. `segmenter` must be the one used to build.
    pub fn search(
        &self,
        query: &str,
        max_results: usize,
        segmenter: &dyn Segmenter,
    ) -> Vec<&DocumentChunk> {
        rank_chunks(&self.chunks, query, max_results, segmenter)
    }
}
