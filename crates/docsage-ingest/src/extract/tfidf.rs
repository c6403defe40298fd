//! TF-IDF model over a small document corpus (the chunks of one build).
//!
//! `tf` is the raw count of a term in a document and
//! `idf(t) = 1 + ln(N / (1 + df(t)))`. Terms are the segmenter's tokens with
//! stop words removed. Used only to describe chunks, never to rank them.

use std::collections::HashMap;

use super::stopwords::is_stop_word;
use crate::segment::Segmenter;

#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    documents: Vec<HashMap<String, usize>>,
    document_frequency: HashMap<String, usize>,
}

impl TfIdfModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model with one document per text, in order.
    pub fn from_texts<'a, I>(texts: I, segmenter: &dyn Segmenter) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut model = Self::new();
        for text in texts {
            model.add_document(text, segmenter);
        }
        model
    }

    /// Add a document; returns its index.
    pub fn add_document(&mut self, text: &str, segmenter: &dyn Segmenter) -> usize {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in segmenter.tokenize(text) {
            if token.is_empty() || is_stop_word(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }

        for term in counts.keys() {
            *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
        }

        self.documents.push(counts);
        self.documents.len() - 1
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency.get(term).copied().unwrap_or(0) as f64;
        1.0 + (self.documents.len() as f64 / (1.0 + df)).ln()
    }

    /// TF-IDF weight of `term` in document `doc`; 0 for unknown documents or absent terms.
    pub fn tfidf(&self, term: &str, doc: usize) -> f64 {
        let tf = self
            .documents
            .get(doc)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0);
        if tf == 0 {
            return 0.0;
        }
        tf as f64 * self.idf(term)
    }

    /// Distinct terms of document `doc` with their weights, highest first.
    pub fn terms(&self, doc: usize) -> Vec<(String, f64)> {
        let Some(counts) = self.documents.get(doc) else {
            return Vec::new();
        };
        let mut terms: Vec<(String, f64)> = counts
            .keys()
            .map(|term| (term.clone(), self.tfidf(term, doc)))
            .collect();
        terms.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        terms
    }

    /// Mean weight over the distinct terms of document `doc`, 0 when it has none.
    pub fn average_score(&self, doc: usize) -> f64 {
        let terms = self.terms(doc);
        if terms.is_empty() {
            return 0.0;
        }
        terms.iter().map(|(_, weight)| weight).sum::<f64>() / terms.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::NaiveSegmenter;

    fn model() -> TfIdfModel {
        TfIdfModel::from_texts(
            ["apple apple banana", "banana cherry", "the of and"],
            &NaiveSegmenter,
        )
    }

    #[test]
    fn test_idf() {
        let model = model();
        // N = 3, df(apple) = 1
        assert!((model.idf("apple") - (1.0 + (3.0f64 / 2.0).ln())).abs() < 1e-12);
        // df(banana) = 2
        assert!((model.idf("banana") - (1.0 + (3.0f64 / 3.0).ln())).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_uses_raw_counts() {
        let model = model();
        assert!((model.tfidf("apple", 0) - 2.0 * model.idf("apple")).abs() < 1e-12);
        assert_eq!(model.tfidf("cherry", 0), 0.0);
        assert_eq!(model.tfidf("apple", 99), 0.0);
    }

    #[test]
    fn test_terms_sorted_by_weight() {
        let terms = model().terms(0);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].0, "apple");
        assert_eq!(terms[1].0, "banana");
    }

    #[test]
    fn test_average_score() {
        let model = model();
        let expected = (model.tfidf("apple", 0) + model.tfidf("banana", 0)) / 2.0;
        assert!((model.average_score(0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_stop_word_only_document_scores_zero() {
        let model = model();
        assert!(model.terms(2).is_empty());
        assert_eq!(model.average_score(2), 0.0);
    }

    #[test]
    fn test_empty_model() {
        let model = TfIdfModel::new();
        assert!(model.is_empty());
        assert_eq!(model.average_score(0), 0.0);
    }
}
