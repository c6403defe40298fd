//! Sentence and word segmentation strategies.
//!
//! Two interchangeable implementations sit behind the [`Segmenter`] trait:
//! - [`LinguisticSegmenter`]: Unicode (UAX #29) sentence and word boundaries.
//! - [`NaiveSegmenter`]: sentences split on `.`/`!`/`?` runs, whitespace tokens.
//!
//! The strategy is picked once from configuration via [`segmenter_for`].

use std::sync::Arc;

use docsage_core::SegmenterKind;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into sentences and lowercase word tokens.
///
/// Implementations never panic, whatever the input; empty or malformed text
/// yields empty sequences.
pub trait Segmenter: Send + Sync {
    /// Split text into trimmed, non-empty sentences in document order.
    fn split_sentences(&self, text: &str) -> Vec<String>;

    /// Split text into lowercase word tokens in document order.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Short strategy name, used in logs.
    fn name(&self) -> &'static str;
}

/// Build the segmenter for a configured strategy.
pub fn segmenter_for(kind: SegmenterKind) -> Arc<dyn Segmenter> {
    match kind {
        SegmenterKind::Linguistic => Arc::new(LinguisticSegmenter),
        SegmenterKind::Naive => Arc::new(NaiveSegmenter),
    }
}

/// Unicode-aware segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinguisticSegmenter;

impl Segmenter for LinguisticSegmenter {
    fn split_sentences(&self, text: &str) -> Vec<String> {
        collapse_whitespace(text)
            .unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(|w| w.to_lowercase()).collect()
    }

    fn name(&self) -> &'static str {
        "linguistic"
    }
}

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Punctuation/whitespace segmentation with no linguistic knowledge.
///
/// Sentence terminators are consumed by the split, so sentences come back
/// without their trailing punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveSegmenter;

impl Segmenter for NaiveSegmenter {
    fn split_sentences(&self, text: &str) -> Vec<String> {
        SENTENCE_BREAK
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}

/// PDF text breaks lines mid-sentence and UAX #29 treats a line feed as a
/// paragraph separator, so fold every whitespace run to one space first.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_sentences() {
        let sentences = NaiveSegmenter.split_sentences("First one. Second one!! Third?  ");
        assert_eq!(sentences, vec!["First one", "Second one", "Third"]);
    }

    #[test]
    fn test_naive_drops_whitespace_fragments() {
        assert!(NaiveSegmenter.split_sentences("").is_empty());
        assert!(NaiveSegmenter.split_sentences(" ... !? \n").is_empty());
    }

    #[test]
    fn test_naive_tokens_are_lowercase_whitespace_split() {
        assert_eq!(
            NaiveSegmenter.tokenize("Hello,  World\nagain"),
            vec!["hello,", "world", "again"]
        );
    }

    #[test]
    fn test_linguistic_sentences_keep_punctuation() {
        let sentences =
            LinguisticSegmenter.split_sentences("The cat sat. Did it\nmove? It did not!");
        assert_eq!(sentences, vec!["The cat sat.", "Did it move?", "It did not!"]);
    }

    #[test]
    fn test_linguistic_tokens_strip_punctuation() {
        assert_eq!(
            LinguisticSegmenter.tokenize("Rust's borrow-checker, (mostly) Works."),
            vec!["rust's", "borrow", "checker", "mostly", "works"]
        );
    }

    #[test]
    fn test_empty_input() {
        for segmenter in [segmenter_for(SegmenterKind::Linguistic), segmenter_for(SegmenterKind::Naive)] {
            assert!(segmenter.split_sentences("").is_empty());
            assert!(segmenter.tokenize("   ").is_empty());
        }
    }

    #[test]
    fn test_segmenter_for_kind() {
        assert_eq!(segmenter_for(SegmenterKind::Naive).name(), "naive");
        assert_eq!(segmenter_for(SegmenterKind::Linguistic).name(), "linguistic");
    }
}
