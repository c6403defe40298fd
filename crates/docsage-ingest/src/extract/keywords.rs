//! Frequency-ranked keyword extraction.

use std::collections::HashMap;

use super::stopwords::is_stop_word;
use crate::segment::Segmenter;

/// Upper bound on keywords returned per text.
pub const MAX_KEYWORDS: usize = 20;

/// Most frequent content words of `text`, most frequent first.
///
/// Tokens of three characters or fewer, purely numeric tokens and stop words
/// are ignored. Equal counts keep first-seen order.
pub fn extract_keywords(text: &str, segmenter: &dyn Segmenter) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for token in segmenter.tokenize(text) {
        if !is_keyword_candidate(&token) {
            continue;
        }
        match slots.get(&token) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(token.clone(), counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

fn is_keyword_candidate(token: &str) -> bool {
    token.chars().count() > 3
        && !token.chars().all(|c| c.is_ascii_digit())
        && !is_stop_word(token)
}
