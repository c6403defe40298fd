//! Sentence-aligned text chunking with overlap.
//!
//! Sentences are packed into chunks of at most `max_chunk_chars` characters.
//! When a sentence no longer fits, the current chunk is emitted and the next
//! one starts with whole trailing sentences of the emitted chunk (up to
//! `overlap_chars`), so context carries across chunk boundaries.

use serde::{Deserialize, Serialize};

use crate::segment::Segmenter;
use docsage_core::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// A contiguous, possibly overlapping slice of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    /// `chunk_<chunk_index>`, unique within one build.
    pub id: String,
    /// Trimmed, non-empty chunk text.
    pub text: String,
    /// Zero-based emission order, matching document order.
    pub chunk_index: usize,
    /// Never populated: extracted text carries no page boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Most frequent first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Mean TF-IDF weight of the chunk's terms against the whole chunk corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfidf_score: Option<f64>,
}

impl DocumentChunk {
    /// A bare chunk: id, text and index only.
    pub fn new(chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("chunk_{chunk_index}"),
            text: text.into(),
            chunk_index,
            page_number: None,
            summary: None,
            keywords: None,
            tfidf_score: None,
        }
    }
}

/// Packs sentences into overlapping chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    /// Soft upper bound on chunk length; one oversized sentence may exceed it.
    pub max_chunk_chars: usize,
    /// Upper bound on the overlap seed carried into the next chunk. Keep it
    /// below `max_chunk_chars`, or chunks grow by one sentence each flush.
    pub overlap_chars: usize,
}

impl Chunker {
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        Self {
            max_chunk_chars,
            overlap_chars,
        }
    }

    /// Split text into chunks. Empty text yields no chunks.
    pub fn chunk(&self, text: &str, segmenter: &dyn Segmenter) -> Vec<DocumentChunk> {
        let sentences = segmenter.split_sentences(text);
        let mut chunks = Vec::new();

        let mut buffer: Vec<&str> = Vec::new();
        let mut buffer_len = 0usize;

        for sentence in &sentences {
            let sentence_len = char_len(sentence);
            let candidate_len = joined_len(buffer_len, buffer.is_empty(), sentence_len);

            if buffer.is_empty() || candidate_len <= self.max_chunk_chars {
                buffer.push(sentence);
                buffer_len = candidate_len;
                continue;
            }

            chunks.push(DocumentChunk::new(chunks.len(), buffer.join(" ")));

            let (seed, seed_len) = self.overlap_seed(&buffer);
            buffer = seed;
            buffer_len = joined_len(seed_len, buffer.is_empty(), sentence_len);
            buffer.push(sentence);
        }

        if !buffer.is_empty() {
            chunks.push(DocumentChunk::new(chunks.len(), buffer.join(" ")));
        }

        chunks
    }

    /// Whole trailing sentences of `flushed` whose joined length stays
    /// within `overlap_chars`, in document order.
    fn overlap_seed<'a>(&self, flushed: &[&'a str]) -> (Vec<&'a str>, usize) {
        let mut seed: Vec<&'a str> = Vec::new();
        let mut seed_len = 0usize;

        for &sentence in flushed.iter().rev() {
            let candidate_len = joined_len(seed_len, seed.is_empty(), char_len(sentence));
            if candidate_len > self.overlap_chars {
                break;
            }
            seed.push(sentence);
            seed_len = candidate_len;
        }

        seed.reverse();
        (seed, seed_len)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Length of `existing + " " + next`, or of `next` alone when nothing precedes it.
fn joined_len(existing_len: usize, existing_empty: bool, next_len: usize) -> usize {
    if existing_empty {
        next_len
    } else {
        existing_len + 1 + next_len
    }
}
