//! Data model shared by the outline and ranking pipelines.
//!
//! Styled lines feed the heading classifier; text blocks feed the relevance
//! scorer. Both are produced by the line collector from reader output.

mod line;
mod outline;
mod section;

pub use line::{size_key, Rgb, StyledLine, FLAG_BOLD, FLAG_ITALIC, FLAG_MONOSPACED, FLAG_SERIFED};
pub use outline::{HeadingCandidate, HeadingLevel, MatchKind, Outline, OutlineEntry};
pub use section::{PersonaQuery, RankedSection, TextBlock};
