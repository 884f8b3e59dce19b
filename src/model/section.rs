//! Ranking-side types.

use serde::{Deserialize, Serialize};

/// One ranking-eligible line of at least three words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Source document identifier (file name)
    pub document_id: String,

    /// Line text
    pub text: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Mean of the spans' whole-number font sizes
    pub font_size: f32,

    /// Cosine similarity to the query; 0.0 until scored
    pub relevance_score: f64,
}

impl TextBlock {
    /// Create an unscored block.
    pub fn new(
        document_id: impl Into<String>,
        text: impl Into<String>,
        page_number: u32,
        font_size: f32,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
            page_number,
            font_size,
            relevance_score: 0.0,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A block that made it into the top-K.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// The scored block
    pub block: TextBlock,
    /// 1-based rank
    pub rank: usize,
}

impl RankedSection {
    /// First `max_chars` characters of the text.
    ///
    /// Cuts on character boundaries, not word boundaries.
    pub fn section_title(&self, max_chars: usize) -> String {
        self.block.text.chars().take(max_chars).collect()
    }

    /// Full text of the block.
    pub fn refined_text(&self) -> &str {
        &self.block.text
    }
}

/// Persona and task description the corpus is ranked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaQuery {
    /// Role description (e.g., "Travel Planner")
    pub persona: String,
    /// Task description
    pub job_to_be_done: String,
}

impl PersonaQuery {
    /// Create a query.
    pub fn new(persona: impl Into<String>, job_to_be_done: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
        }
    }

    /// Persona and job joined by a single space.
    pub fn query(&self) -> String {
        format!("{} {}", self.persona, self.job_to_be_done)
    }
}
