//! Query-time relevance scoring: a full scan over the chunk set.
//!
//! `score = overlap + 2 * keyword_matches + (5 if the chunk contains the whole query)`
//!
//! - `overlap`: query tokens (duplicates counted) present among the chunk's tokens.
//! - `keyword_matches`: query tokens contained as a substring in any chunk keyword,
//!   so a short token like `art` also matches `start`.
//!
//! The weights are empirical and tunable; nothing depends on their exact values.

use std::collections::HashSet;

use docsage_ingest::{DocumentChunk, Segmenter};

pub const OVERLAP_WEIGHT: usize = 1;
pub const KEYWORD_WEIGHT: usize = 2;
pub const PHRASE_BONUS: usize = 5;

/// Chunks returned when the caller does not ask for a specific count.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Score one chunk against already-tokenized, lowercased query input.
pub fn score_chunk(
    chunk: &DocumentChunk,
    query_tokens: &[String],
    query_lower: &str,
    segmenter: &dyn Segmenter,
) -> usize {
    let chunk_tokens: HashSet<String> = segmenter.tokenize(&chunk.text).into_iter().collect();
    let overlap = query_tokens
        .iter()
        .filter(|token| chunk_tokens.contains(token.as_str()))
        .count();

    let keyword_matches = chunk.keywords.as_deref().map_or(0, |keywords| {
        query_tokens
            .iter()
            .filter(|token| keywords.iter().any(|k| k.contains(token.as_str())))
            .count()
    });

    let phrase = if chunk.text.to_lowercase().contains(query_lower) {
        PHRASE_BONUS
    } else {
        0
    };

    overlap * OVERLAP_WEIGHT + keyword_matches * KEYWORD_WEIGHT + phrase
}

/// Up to `max_results` chunks by descending score; equal scores keep chunk order.
pub fn rank_chunks<'a>(
    chunks: &'a [DocumentChunk],
    query: &str,
    max_results: usize,
    segmenter: &dyn Segmenter,
) -> Vec<&'a DocumentChunk> {
    let query_lower = query.to_lowercase();
    let query_tokens = segmenter.tokenize(&query_lower);

    let mut scored: Vec<(usize, &DocumentChunk)> = chunks
        .iter()
        .map(|chunk| (score_chunk(chunk, &query_tokens, &query_lower, segmenter), chunk))
        .collect();

    // Stable: ties stay in chunk order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(max_results)
        .map(|(_, chunk)| chunk)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsage_ingest::{LinguisticSegmenter, NaiveSegmenter};

    fn chunk(index: usize, text: &str, keywords: &[&str]) -> DocumentChunk {
        let mut chunk = DocumentChunk::new(index, text);
        chunk.keywords = Some(keywords.iter().map(|k| k.to_string()).collect());
        chunk
    }

    fn score(chunk: &DocumentChunk, query: &str) -> usize {
        let query_lower = query.to_lowercase();
        let tokens = NaiveSegmenter.tokenize(&query_lower);
        score_chunk(chunk, &tokens, &query_lower, &NaiveSegmenter)
    }

    #[test]
    fn test_score_components() {
        let c = chunk(0, "apple banana cherry", &["apple", "banana", "cherry"]);
        // 2 overlaps + 2 keyword matches * 2 + phrase bonus
        assert_eq!(score(&c, "banana cherry"), 2 + 4 + 5);
        // no phrase: "cherry banana" is not a substring
        assert_eq!(score(&c, "cherry banana"), 2 + 4);
    }

    #[test]
    fn test_overlap_counts_duplicate_query_tokens() {
        let c = chunk(0, "banana split", &[]);
        assert_eq!(score(&c, "banana banana"), 2);
    }

    #[test]
    fn test_keyword_match_is_substring() {
        let c = chunk(0, "nothing shared", &["start"]);
        assert_eq!(score(&c, "art"), 2);
    }

    #[test]
    fn test_chunk_without_keywords() {
        let c = DocumentChunk::new(0, "plain text");
        assert_eq!(score(&c, "plain"), 1 + PHRASE_BONUS);
    }

    #[test]
    fn test_phrase_bonus_is_case_insensitive() {
        let c = chunk(0, "The Quick Brown fox", &[]);
        assert_eq!(score(&c, "quick brown"), 2 + PHRASE_BONUS);
    }

    #[test]
    fn test_rank_orders_by_score_and_keeps_ties_stable() {
        let chunks = vec![
            chunk(0, "banana date", &["banana", "date"]),
            chunk(1, "apple banana cherry", &["apple", "banana", "cherry"]),
            chunk(2, "cherry", &["cherry"]),
            chunk(3, "unrelated words", &["unrelated", "words"]),
        ];
        let ranked = rank_chunks(&chunks, "banana cherry", 10, &LinguisticSegmenter);
        let order: Vec<usize> = ranked.iter().map(|c| c.chunk_index).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_rank_truncates_to_max_results() {
        let chunks: Vec<DocumentChunk> = (0..10)
            .map(|i| chunk(i, "same text", &["same", "text"]))
            .collect();
        let ranked = rank_chunks(&chunks, "same", DEFAULT_MAX_RESULTS, &LinguisticSegmenter);
        let order: Vec<usize> = ranked.iter().map(|c| c.chunk_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_rank_empty_chunk_set() {
        assert!(rank_chunks(&[], "anything", 3, &LinguisticSegmenter).is_empty());
    }
}
