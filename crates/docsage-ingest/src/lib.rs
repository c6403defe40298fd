//! DocSage Ingest: segmentation, chunking, keyword/summary extraction, PDF text extraction.

pub mod chunking;
pub mod extract;
pub mod file;
pub mod ingest;
pub mod segment;

pub use chunking::{Chunker, DocumentChunk};
pub use extract::{extract_keywords, generate_summary, is_stop_word, SummaryLimits, TfIdfModel};
pub use file::{ExtractedText, PdfExtractor, TextExtractor};
pub use ingest::{content_hash, DocumentSource, PdfFileSource};
pub use segment::{segmenter_for, LinguisticSegmenter, NaiveSegmenter, Segmenter};
