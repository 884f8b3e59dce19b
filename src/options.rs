//! Pipeline options and configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{PersonaQuery, FLAG_BOLD};

/// Default minimum font size for structural headings.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 10.0;

/// Default per-channel threshold below which a color counts as black.
pub const DEFAULT_BLACK_THRESHOLD: u8 = 60;

/// Span-flag bits that mark a line as bold.
pub const DEFAULT_BOLD_FLAG_MASK: u32 = FLAG_BOLD | (1 << 5) | (1 << 16) | (1 << 18);

/// Default number of ranked sections to return.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum word count for a ranking-eligible line.
pub const DEFAULT_MIN_WORDS: usize = 3;

/// Default length of a section title, in characters.
pub const DEFAULT_TITLE_CHARS: usize = 80;

/// Error handling mode when a document in a batch cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first unreadable document
    #[default]
    Strict,
    /// Log and skip unreadable documents
    Lenient,
}

/// Options for heading classification and outline building.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Minimum font size for structural headings
    pub min_font_size: f32,

    /// Per-channel threshold for a near-black title color
    pub black_threshold: u8,

    /// Span-flag bits that count as bold
    pub bold_flag_mask: u32,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum font size for structural headings.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the near-black threshold for title selection.
    pub fn with_black_threshold(mut self, threshold: u8) -> Self {
        self.black_threshold = threshold;
        self
    }

    /// Set the bold flag mask.
    pub fn with_bold_flag_mask(mut self, mask: u32) -> Self {
        self.bold_flag_mask = mask;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            black_threshold: DEFAULT_BLACK_THRESHOLD,
            bold_flag_mask: DEFAULT_BOLD_FLAG_MASK,
        }
    }
}

/// Options for collecting and ranking text blocks.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Number of sections to keep
    pub top_k: usize,

    /// Minimum words for a line to be ranked
    pub min_words: usize,

    /// Characters kept in a section title
    pub title_chars: usize,

    /// Read documents in parallel
    pub parallel: bool,

    /// Error handling mode for unreadable documents
    pub error_mode: ErrorMode,
}

impl RankOptions {
    /// Create new rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections to keep.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the minimum word count.
    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    /// Set the section title length.
    pub fn with_title_chars(mut self, chars: usize) -> Self {
        self.title_chars = chars;
        self
    }

    /// Enable lenient mode (skip unreadable documents).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Disable parallel document reading.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_words: DEFAULT_MIN_WORDS,
            title_chars: DEFAULT_TITLE_CHARS,
            parallel: true,
            error_mode: ErrorMode::Strict,
        }
    }
}

/// Ranking job description loaded from a JSON file.
///
/// ```json
/// {
///   "persona": "Travel Planner",
///   "job_to_be_done": "Plan a trip of 4 days for a group of 10 college friends.",
///   "top_k": 5,
///   "documents": ["south_of_france.pdf"]
/// }
/// ```
///
/// Relative document paths resolve against the config file's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Role description
    #[serde(default)]
    pub persona: String,

    /// Task description
    #[serde(default)]
    pub job_to_be_done: String,

    /// Number of sections to keep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    /// Documents to rank together
    #[serde(default)]
    pub documents: Vec<PathBuf>,
}

impl RankingConfig {
    /// Load a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let mut config: RankingConfig = serde_json::from_str(&data)?;

        if let Some(base) = path.parent() {
            for doc in &mut config.documents {
                if doc.is_relative() {
                    *doc = base.join(&*doc);
                }
            }
        }
        Ok(config)
    }

    /// Build the persona query. Empty fields are allowed; such a query
    /// simply overlaps nothing.
    pub fn query(&self) -> PersonaQuery {
        PersonaQuery::new(&self.persona, &self.job_to_be_done)
    }

    /// Apply the configured `top_k` over `options`.
    pub fn apply(&self, options: RankOptions) -> RankOptions {
        match self.top_k {
            Some(k) => options.with_top_k(k),
            None => options,
        }
    }
}
