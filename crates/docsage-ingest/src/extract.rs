//! Heuristic text statistics: keywords, extractive summaries, TF-IDF.
//!
//! Everything here is purely lexical. Callers pass the [`Segmenter`] so the
//! same strategy drives chunking, extraction and query-time scoring.
//!
//! [`Segmenter`]: crate::segment::Segmenter

pub mod keywords;
pub mod stopwords;
pub mod summary;
pub mod tfidf;

pub use keywords::{extract_keywords, MAX_KEYWORDS};
pub use stopwords::is_stop_word;
pub use summary::{generate_summary, SummaryLimits};
pub use tfidf::TfIdfModel;
