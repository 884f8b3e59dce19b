//! Heading and outline types.

use super::StyledLine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading depth: H1 is the coarsest, H3 the finest and the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Largest heading size
    H1,
    /// Second largest heading size
    H2,
    /// Third largest heading size, and every smaller one
    H3,
}

impl HeadingLevel {
    /// Level for a 0-based rank among the distinct heading sizes.
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Label as used in the outline JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which heading grammar accepted a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Fiction-style lexical marker ("Chapter 3", "Prologue", ...)
    Narrative,
    /// Bold, large, short academic heading
    Structural,
    /// Both grammars accepted the line
    Both,
    /// Neither grammar accepted the line
    None,
}

impl MatchKind {
    /// Combine the two grammar outcomes.
    pub fn from_flags(narrative: bool, structural: bool) -> Self {
        match (narrative, structural) {
            (true, true) => MatchKind::Both,
            (true, false) => MatchKind::Narrative,
            (false, true) => MatchKind::Structural,
            (false, false) => MatchKind::None,
        }
    }

    /// True when at least one grammar fired.
    pub fn is_candidate(&self) -> bool {
        !matches!(self, MatchKind::None)
    }
}

/// A line accepted by at least one heading grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// The accepted line
    pub line: StyledLine,
    /// Grammar that accepted it
    pub kind: MatchKind,
}

impl HeadingCandidate {
    /// Wrap a classified line.
    pub fn new(line: StyledLine, kind: MatchKind) -> Self {
        Self { line, kind }
    }

    /// True if the line is on page 1 and rendered near-black.
    pub fn is_title_candidate(&self, black_threshold: u8) -> bool {
        self.line.page_number == 1 && self.line.color.is_near_black(black_threshold)
    }
}

/// One entry of an extracted outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Title plus ordered headings of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title, empty when no line qualified
    pub title: String,
    /// Headings in first-seen order
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is neither a title nor any entry.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.entries.is_empty()
    }

    /// Number of entries at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }
}
