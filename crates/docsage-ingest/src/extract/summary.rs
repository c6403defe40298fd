//! Extractive summaries: the leading sentences of a text.

use crate::segment::Segmenter;

/// Sentence and length limits for a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub max_sentences: usize,
    /// Longer summaries are cut to this many characters and suffixed with `...`.
    pub max_chars: usize,
}

impl SummaryLimits {
    /// Whole-document overview.
    pub const DOCUMENT: Self = Self {
        max_sentences: 3,
        max_chars: 500,
    };

    /// Per-chunk summary.
    pub const CHUNK: Self = Self {
        max_sentences: 2,
        max_chars: 200,
    };
}

/// First `max_sentences` sentences joined by a single space, truncated to
/// `max_chars` characters plus `...` when longer.
pub fn generate_summary(text: &str, segmenter: &dyn Segmenter, limits: SummaryLimits) -> String {
    let summary = segmenter
        .split_sentences(text)
        .into_iter()
        .take(limits.max_sentences)
        .collect::<Vec<_>>()
        .join(" ");

    match summary.char_indices().nth(limits.max_chars) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary,
    }
}
