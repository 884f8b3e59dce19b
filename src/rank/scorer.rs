//! Relevance ranking of text blocks against a persona query.

use std::cmp::Ordering;

use super::tfidf::{cosine, TfidfModel};
use crate::model::{RankedSection, TextBlock};
use crate::options::DEFAULT_TOP_K;

/// Scores text blocks against a query and keeps the top K.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    top_k: usize,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl RelevanceScorer {
    /// Create a scorer keeping `top_k` sections.
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Set `relevance_score` on every block.
    ///
    /// The vector space is fitted on the query plus all block texts, so the
    /// scores of a block depend on the whole batch.
    pub fn score(&self, query: &str, blocks: &mut [TextBlock]) {
        if blocks.is_empty() {
            return;
        }

        let corpus: Vec<&str> = std::iter::once(query)
            .chain(blocks.iter().map(|b| b.text.as_str()))
            .collect();
        let model = TfidfModel::fit(&corpus);
        log::debug!(
            "TF-IDF space: {} documents, {} terms",
            model.documents(),
            model.vocabulary_len()
        );

        let query_vector = model.transform(query);
        for block in blocks.iter_mut() {
            block.relevance_score = cosine(&query_vector, &model.transform(&block.text));
        }
    }

    /// Score, sort and truncate.
    ///
    /// Order is descending score, then descending font size; equal blocks
    /// keep their input order.
    pub fn rank(&self, query: &str, mut blocks: Vec<TextBlock>) -> Vec<RankedSection> {
        self.score(query, &mut blocks);

        blocks.sort_by(|a, b| {
            b.relevance_score
                .total_cmp(&a.relevance_score)
                .then_with(|| b.font_size.partial_cmp(&a.font_size).unwrap_or(Ordering::Equal))
        });

        blocks
            .into_iter()
            .take(self.top_k)
            .enumerate()
            .map(|(i, block)| RankedSection { block, rank: i + 1 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "Travel Planner Plan a trip of 4 days for a group of 10 college friends.";

    fn block(doc: &str, text: &str, size: f32) -> TextBlock {
        TextBlock::new(doc, text, 1, size)
    }

    #[test]
    fn test_rank_travel_query() {
        let blocks = vec![
            block("finance.pdf", "Quarterly revenue grew by eight percent", 12.0),
            block("trip.pdf", "Plan a group trip with friends to a beach villa", 12.0),
        ];

        let ranked = RelevanceScorer::default().rank(QUERY, blocks);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].block.document_id, "trip.pdf");
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].block.relevance_score > 0.0);
        assert_eq!(ranked[1].block.relevance_score, 0.0);
        assert!(ranked[1].block.relevance_score.is_sign_positive());
    }

    #[test]
    fn test_identical_text_scores_one() {
        let blocks = vec![block("a.pdf", QUERY, 12.0)];
        let ranked = RelevanceScorer::default().rank(QUERY, blocks);
        assert!((ranked[0].block.relevance_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_blocks() {
        assert!(RelevanceScorer::default().rank(QUERY, Vec::new()).is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let blocks: Vec<_> = (0..8)
            .map(|i| block("a.pdf", &format!("college trip number {}", i), 12.0))
            .collect();

        assert_eq!(RelevanceScorer::new(5).rank(QUERY, blocks.clone()).len(), 5);
        assert_eq!(RelevanceScorer::new(20).rank(QUERY, blocks).len(), 8);
    }

    #[test]
    fn test_ties_break_on_font_size_then_order() {
        let blocks = vec![
            block("a.pdf", "unrelated words only here", 10.0),
            block("b.pdf", "nothing matching at all", 14.0),
            block("c.pdf", "completely different content again", 14.0),
        ];

        let ranked = RelevanceScorer::default().rank(QUERY, blocks);
        let docs: Vec<_> = ranked.iter().map(|r| r.block.document_id.as_str()).collect();
        assert_eq!(docs, vec!["b.pdf", "c.pdf", "a.pdf"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let blocks = vec![
            block("a.pdf", "Explore coastal towns with college friends", 11.0),
            block("b.pdf", "Nightlife and bars for a group trip", 12.0),
            block("c.pdf", "Packing tips for four days", 12.0),
        ];

        let scorer = RelevanceScorer::default();
        assert_eq!(scorer.rank(QUERY, blocks.clone()), scorer.rank(QUERY, blocks));
    }

    #[test]
    fn test_more_overlap_scores_higher() {
        let blocks = vec![
            block("a.pdf", "Day trip ideas for the weekend", 12.0),
            block("b.pdf", "Day trip ideas for college friends group", 12.0),
        ];

        let ranked = RelevanceScorer::default().rank(QUERY, blocks);
        assert_eq!(ranked[0].block.document_id, "b.pdf");
        assert!(ranked[0].block.relevance_score > ranked[1].block.relevance_score);
    }
}
