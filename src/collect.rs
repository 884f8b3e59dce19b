//! Line collection: reader output to styled lines and text blocks.
//!
//! The heading pipeline takes the style of a line's first span; the ranking
//! pipeline averages whole-number span sizes and keeps only lines with
//! enough words.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{Rgb, StyledLine, TextBlock};
use crate::options::{ErrorMode, RankOptions};
use crate::reader::{document_id, DocumentReader, LineRecord, PageRecord};

/// Round half to even, to one decimal.
///
/// Scaling happens in f64, where `size * 10.0` is exact for any f32.
fn round_tenth(size: f32) -> f32 {
    ((size as f64 * 10.0).round_ties_even() / 10.0) as f32
}

/// Build the heading-flavored line for one record, if it has text.
fn styled_line(document_id: &str, page: u32, line: &LineRecord) -> Option<StyledLine> {
    let first = line.spans.first()?;
    let text: String = line.spans.iter().map(|s| s.text.as_str()).collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(StyledLine {
        document_id: document_id.to_string(),
        page_number: page,
        text: text.to_string(),
        font_size: round_tenth(first.size),
        font_name: first.font.clone(),
        style_flags: first.flags,
        color: Rgb::from_packed(first.color),
    })
}

/// Build the ranking-flavored block for one record, if it is long enough.
fn text_block(
    document_id: &str,
    page: u32,
    line: &LineRecord,
    min_words: usize,
) -> Option<TextBlock> {
    let text = line
        .spans
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let text = text.trim();
    if text.is_empty() || text.split_whitespace().count() < min_words {
        return None;
    }

    let sizes: Vec<f32> = line.spans.iter().map(|s| s.size.round_ties_even()).collect();
    let font_size = sizes.iter().sum::<f32>() / sizes.len() as f32;

    Some(TextBlock::new(document_id, text, page, font_size))
}

/// Flatten pages into heading-flavored lines in scan order.
pub fn styled_lines(document_id: &str, pages: &[PageRecord]) -> Vec<StyledLine> {
    pages
        .iter()
        .flat_map(|page| {
            page.lines
                .iter()
                .filter_map(move |line| styled_line(document_id, page.number, line))
        })
        .collect()
}

/// Flatten pages into ranking-eligible blocks in scan order.
pub fn text_blocks(document_id: &str, pages: &[PageRecord], min_words: usize) -> Vec<TextBlock> {
    pages
        .iter()
        .flat_map(|page| {
            page.lines
                .iter()
                .filter_map(move |line| text_block(document_id, page.number, line, min_words))
        })
        .collect()
}

/// Collects lines from documents through a [`DocumentReader`].
pub struct LineCollector<'r> {
    reader: &'r dyn DocumentReader,
}

impl<'r> LineCollector<'r> {
    /// Create a collector over a reader.
    pub fn new(reader: &'r dyn DocumentReader) -> Self {
        Self { reader }
    }

    /// Heading-flavored lines of one document.
    pub fn collect_lines(&self, path: &Path) -> Result<Vec<StyledLine>> {
        let pages = self.reader.read_pages(path)?;
        let lines = styled_lines(&document_id(path), &pages);
        log::debug!("{}: {} styled lines", path.display(), lines.len());
        Ok(lines)
    }

    /// Ranking-eligible blocks of every document, pooled in input order.
    ///
    /// Every document is read before this returns; scoring needs the whole
    /// batch.
    pub fn collect_blocks(
        &self,
        paths: &[PathBuf],
        options: &RankOptions,
    ) -> Result<Vec<TextBlock>> {
        let read_one = |path: &PathBuf| -> Result<Vec<TextBlock>> {
            let pages = self.reader.read_pages(path)?;
            Ok(text_blocks(&document_id(path), &pages, options.min_words))
        };

        let results: Vec<(&PathBuf, Result<Vec<TextBlock>>)> = if options.parallel {
            paths.par_iter().map(|p| (p, read_one(p))).collect()
        } else {
            paths.iter().map(|p| (p, read_one(p))).collect()
        };

        let mut blocks = Vec::new();
        for (path, result) in results {
            match result {
                Ok(mut doc_blocks) => {
                    log::debug!("{}: {} text blocks", path.display(), doc_blocks.len());
                    blocks.append(&mut doc_blocks);
                }
                Err(e) if options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Collected {} text blocks from {} documents",
            blocks.len(),
            paths.len()
        );
        Ok(blocks)
    }
}
