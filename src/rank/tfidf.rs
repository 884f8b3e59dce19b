//! TF-IDF vector space with cosine similarity.
//!
//! Raw term counts, smoothed IDF `ln((1 + n) / (1 + df)) + 1`, and L2
//! normalization. Maps are ordered so that sums are reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

/// Sparse, L2-normalized term vector.
pub type TermVector = BTreeMap<String, f64>;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").unwrap())
}

/// Lowercase and split into runs of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Term counts of one text.
pub fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// IDF weights fitted on a corpus.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    idf: BTreeMap<String, f64>,
    documents: usize,
}

impl TfidfModel {
    /// Fit IDF weights; every text counts as one document.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for text in corpus {
            let terms: BTreeSet<String> = tokenize(text.as_ref()).into_iter().collect();
            for term in terms {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = df
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Self {
            idf,
            documents: corpus.len(),
        }
    }

    /// Number of documents the model was fitted on.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Number of distinct terms.
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// IDF weight of a term, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Weighted, normalized vector of `text`. Unknown terms are dropped; a
    /// text with no known terms yields an empty vector.
    pub fn transform(&self, text: &str) -> TermVector {
        let mut vector: TermVector = term_counts(text)
            .into_iter()
            .filter_map(|(term, count)| {
                let idf = self.idf.get(&term)?;
                Some((term, count as f64 * idf))
            })
            .collect();

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }
}

/// Cosine similarity of two normalized vectors; 0.0 if either is empty.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .fold(0.0, |acc, x| acc + x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Plan a 4-day Trip, for 10 friends!"),
            vec!["plan", "day", "trip", "for", "10", "friends"]
        );
        assert_eq!(tokenize("Été à Nice"), vec!["été", "nice"]);
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn test_idf_smoothing() {
        let model = TfidfModel::fit(&["apple banana", "apple cherry", "apple"]);
        assert_eq!(model.documents(), 3);
        assert_eq!(model.vocabulary_len(), 3);
        // Term in every document: ln(4/4) + 1
        assert!((model.idf("apple").unwrap() - 1.0).abs() < 1e-12);
        assert!((model.idf("banana").unwrap() - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(model.idf("durian"), None);
    }

    #[test]
    fn test_transform_is_normalized() {
        let model = TfidfModel::fit(&["red green", "green blue blue"]);
        let v = model.transform("green blue blue");
        let norm: f64 = v.values().map(|w| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(v["blue"] > v["green"]);
    }

    #[test]
    fn test_cosine_bounds() {
        let corpus = ["coastal villa beach", "coastal villa beach", "quarterly revenue"];
        let model = TfidfModel::fit(&corpus);
        let a = model.transform(corpus[0]);
        let b = model.transform(corpus[1]);
        let c = model.transform(corpus[2]);

        assert!((cosine(&a, &b) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&a, &c), 0.0);
        assert_eq!(cosine(&a, &TermVector::new()), 0.0);
    }

    #[test]
    fn test_cosine_without_overlap_is_positive_zero() {
        let model = TfidfModel::fit(&["coastal villa", "quarterly revenue"]);
        let villa = model.transform("coastal villa");
        let revenue = model.transform("quarterly revenue");
        let score = cosine(&villa, &revenue);
        assert_eq!(score.to_bits(), 0.0f64.to_bits());
        assert_eq!(serde_json::to_string(&score).unwrap(), "0.0");
    }
}
