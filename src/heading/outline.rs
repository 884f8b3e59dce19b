//! Outline assembly from heading candidates.

use std::collections::{BTreeMap, HashSet};

use crate::model::{size_key, HeadingCandidate, HeadingLevel, Outline, OutlineEntry};
use crate::options::DEFAULT_BLACK_THRESHOLD;

/// Number of distinct sizes that get their own level.
const RANKED_LEVELS: usize = 3;

/// Font size to heading level mapping for one document.
///
/// The three largest distinct candidate sizes map to H1, H2 and H3. Every
/// other size is H3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    /// Size in tenths of a point to level
    levels: BTreeMap<i32, HeadingLevel>,
}

impl LevelMap {
    /// Build the mapping from a document's candidates.
    pub fn from_candidates(candidates: &[HeadingCandidate]) -> Self {
        Self::from_sizes(candidates.iter().map(|c| c.line.font_size))
    }

    /// Build the mapping from raw font sizes.
    pub fn from_sizes<I: IntoIterator<Item = f32>>(sizes: I) -> Self {
        let mut keys: Vec<i32> = sizes.into_iter().map(size_key).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.dedup();

        let levels = keys
            .into_iter()
            .take(RANKED_LEVELS)
            .enumerate()
            .map(|(rank, key)| (key, HeadingLevel::from_rank(rank)))
            .collect();

        Self { levels }
    }

    /// Level for a font size.
    pub fn level_for(&self, size: f32) -> HeadingLevel {
        self.levels
            .get(&size_key(size))
            .copied()
            .unwrap_or(HeadingLevel::H3)
    }

    /// Number of sizes with an assigned level (at most three).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when no candidate sizes were seen.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Builds an [`Outline`] from classified candidates.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    black_threshold: u8,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BLACK_THRESHOLD)
    }
}

impl OutlineBuilder {
    /// Create a builder; `black_threshold` bounds each channel of the title
    /// color.
    pub fn new(black_threshold: u8) -> Self {
        Self { black_threshold }
    }

    /// Assemble title and deduplicated entries in scan order.
    pub fn build(&self, candidates: &[HeadingCandidate]) -> Outline {
        let levels = LevelMap::from_candidates(candidates);
        log::debug!("Level map: {:?}", levels);

        let title = candidates
            .iter()
            .find(|c| c.is_title_candidate(self.black_threshold))
            .map(|c| c.line.text.clone())
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for candidate in candidates {
            if !seen.insert(candidate.line.text.as_str()) {
                continue;
            }
            entries.push(OutlineEntry {
                level: levels.level_for(candidate.line.font_size),
                text: candidate.line.text.clone(),
                page: candidate.line.page_number,
            });
        }

        Outline { title, entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchKind, Rgb, StyledLine};

    fn candidate(text: &str, page: u32, size: f32) -> HeadingCandidate {
        HeadingCandidate::new(
            StyledLine::new("doc.pdf", page, text).with_size(size),
            MatchKind::Structural,
        )
    }

    #[test]
    fn test_level_map_top_three() {
        let map = LevelMap::from_sizes([12.0, 18.0, 14.0, 18.0, 10.0, 16.0]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.level_for(18.0), HeadingLevel::H1);
        assert_eq!(map.level_for(16.0), HeadingLevel::H2);
        assert_eq!(map.level_for(14.0), HeadingLevel::H3);
        assert_eq!(map.level_for(12.0), HeadingLevel::H3);
        assert_eq!(map.level_for(10.0), HeadingLevel::H3);
        assert_eq!(map.level_for(99.0), HeadingLevel::H3);
    }

    #[test]
    fn test_level_map_single_size() {
        let map = LevelMap::from_sizes([10.0]);
        assert_eq!(map.level_for(10.0), HeadingLevel::H1);
        assert!(LevelMap::from_sizes(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_build_empty() {
        let outline = OutlineBuilder::default().build(&[]);
        assert_eq!(outline, Outline::new());
    }

    #[test]
    fn test_build_dedups_by_text() {
        let candidates = vec![
            candidate("Introduction", 1, 16.0),
            candidate("Methods", 2, 14.0),
            candidate("Introduction", 5, 16.0),
        ];

        let outline = OutlineBuilder::default().build(&candidates);
        assert_eq!(outline.entries.len(), 2);
        assert_eq!(outline.entries[0].text, "Introduction");
        assert_eq!(outline.entries[0].page, 1);
        assert_eq!(outline.entries[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_title_first_black_on_page_one() {
        let red = HeadingCandidate::new(
            StyledLine::new("doc.pdf", 1, "Draft")
                .with_size(20.0)
                .with_color(Rgb::new(200, 0, 0)),
            MatchKind::Structural,
        );
        let candidates = vec![
            red,
            candidate("Annual Report", 1, 18.0),
            candidate("Overview", 1, 14.0),
        ];

        let outline = OutlineBuilder::default().build(&candidates);
        assert_eq!(outline.title, "Annual Report");
        // The title also stays in the outline
        assert_eq!(outline.entries[1].text, "Annual Report");
        assert_eq!(outline.entries[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_no_title_without_page_one() {
        let candidates = vec![candidate("Chapter 1", 2, 14.0)];
        let outline = OutlineBuilder::default().build(&candidates);
        assert_eq!(outline.title, "");
        assert_eq!(outline.entries.len(), 1);
    }

    #[test]
    fn test_black_threshold_is_strict() {
        let grey = HeadingCandidate::new(
            StyledLine::new("doc.pdf", 1, "Title")
                .with_size(20.0)
                .with_color(Rgb::new(60, 0, 0)),
            MatchKind::Structural,
        );
        assert_eq!(OutlineBuilder::default().build(&[grey.clone()]).title, "");
        assert_eq!(OutlineBuilder::new(61).build(&[grey]).title, "Title");
    }
}
