//! Persona-driven relevance ranking.
//!
//! Ranking runs in two phases: every document of the batch is collected
//! into [`TextBlock`](crate::model::TextBlock)s first, then the whole pool is
//! scored in one TF-IDF space.

pub mod scorer;
pub mod tfidf;

pub use scorer::RelevanceScorer;
pub use tfidf::{cosine, tokenize, TermVector, TfidfModel};
