//! # pdfsift
//!
//! Structural outlines and persona-driven section ranking for PDF documents.
//!
//! Two pipelines share one reader:
//!
//! - **Outline**: classify each line as a heading candidate (narrative
//!   markers or bold, short, large structural headings), map the three
//!   largest candidate sizes to H1/H2/H3 and emit a deduplicated outline with
//!   a title.
//! - **Ranking**: pool every line of three or more words across a batch of
//!   documents, score it against a "persona + job" query in a TF-IDF space
//!   and keep the top K.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use pdfsift::{extract_outline, rank_documents, PersonaQuery, RankOptions};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let outline = extract_outline("paper.pdf")?;
//!     println!("{}: {} headings", outline.title, outline.entries.len());
//!
//!     let query = PersonaQuery::new("Travel Planner", "Plan a 4-day trip for 10 friends");
//!     let docs = vec![PathBuf::from("guide.pdf")];
//!     let report = rank_documents(&docs, &query, RankOptions::default())?;
//!     println!("{}", pdfsift::to_json(&report, pdfsift::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```

pub mod collect;
pub mod error;
pub mod heading;
pub mod model;
pub mod options;
pub mod rank;
pub mod reader;
pub mod report;

pub use collect::LineCollector;
pub use error::{Error, Result};
pub use heading::{build_outline, HeadingClassifier, LevelMap, OutlineBuilder};
pub use model::{
    HeadingCandidate, HeadingLevel, MatchKind, Outline, OutlineEntry, PersonaQuery, RankedSection,
    Rgb, StyledLine, TextBlock,
};
pub use options::{ErrorMode, OutlineOptions, RankOptions, RankingConfig};
pub use rank::RelevanceScorer;
pub use reader::{discover_documents, DocumentReader, PageRecord, PdfReader};
pub use report::{to_json, write_json, JsonFormat, OutlineReport, RankingReport};

use std::path::{Path, PathBuf};

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let outline = pdfsift::extract_outline("novel.pdf").unwrap();
/// for entry in &outline.entries {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<Outline> {
    outline_with_reader(&PdfReader::new(), path.as_ref(), options)
}

/// Build an outline from already-read pages.
pub fn outline_from_pages(
    document_id: &str,
    pages: &[PageRecord],
    options: &OutlineOptions,
) -> Outline {
    build_outline(collect::styled_lines(document_id, pages), options)
}

/// Rank the sections of a batch of PDF files against a persona query.
///
/// Every document is read before scoring starts. The report is stamped with
/// the current local time.
pub fn rank_documents(
    paths: &[PathBuf],
    query: &PersonaQuery,
    options: RankOptions,
) -> Result<RankingReport> {
    Sift::new().with_rank_options(options).rank(paths, query)
}

fn outline_with_reader(
    reader: &dyn DocumentReader,
    path: &Path,
    options: &OutlineOptions,
) -> Result<Outline> {
    let lines = LineCollector::new(reader).collect_lines(path)?;
    let outline = build_outline(lines, options);
    log::info!(
        "{}: title {:?}, {} headings",
        path.display(),
        outline.title,
        outline.entries.len()
    );
    Ok(outline)
}

/// Builder for outline extraction and ranking.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
///
/// use pdfsift::{PersonaQuery, Sift};
///
/// let sift = Sift::new().with_min_font_size(11.0).with_top_k(10).lenient();
///
/// let outline = sift.outline("report.pdf")?;
/// let ranking = sift.rank(
///     &[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
///     &PersonaQuery::new("HR professional", "Create fillable onboarding forms"),
/// )?;
/// # Ok::<(), pdfsift::Error>(())
/// ```
pub struct Sift {
    reader: Box<dyn DocumentReader>,
    outline_options: OutlineOptions,
    rank_options: RankOptions,
}

impl Sift {
    /// Create a builder reading PDFs with default options.
    pub fn new() -> Self {
        Self {
            reader: Box::new(PdfReader::new()),
            outline_options: OutlineOptions::default(),
            rank_options: RankOptions::default(),
        }
    }

    /// Replace the document reader.
    pub fn with_reader(mut self, reader: impl DocumentReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Replace the outline options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline_options = options;
        self
    }

    /// Replace the rank options.
    pub fn with_rank_options(mut self, options: RankOptions) -> Self {
        self.rank_options = options;
        self
    }

    /// Set the minimum font size for structural headings.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.outline_options = self.outline_options.with_min_font_size(size);
        self
    }

    /// Set the number of ranked sections.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.rank_options = self.rank_options.with_top_k(top_k);
        self
    }

    /// Skip unreadable documents in a batch instead of failing.
    pub fn lenient(mut self) -> Self {
        self.rank_options = self.rank_options.lenient();
        self
    }

    /// Read batch documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.rank_options = self.rank_options.sequential();
        self
    }

    /// Extract the outline of one document.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        outline_with_reader(self.reader.as_ref(), path.as_ref(), &self.outline_options)
    }

    /// Rank a batch, stamped with the current local time.
    pub fn rank(&self, paths: &[PathBuf], query: &PersonaQuery) -> Result<RankingReport> {
        self.rank_at(paths, query, report::timestamp())
    }

    /// Rank a batch with an explicit processing timestamp.
    pub fn rank_at(
        &self,
        paths: &[PathBuf],
        query: &PersonaQuery,
        timestamp: impl Into<String>,
    ) -> Result<RankingReport> {
        let blocks =
            LineCollector::new(self.reader.as_ref()).collect_blocks(paths, &self.rank_options)?;
        let ranked = RelevanceScorer::new(self.rank_options.top_k).rank(&query.query(), blocks);

        let documents = paths.iter().map(|p| reader::document_id(p)).collect();
        Ok(RankingReport::new(
            documents,
            query,
            &ranked,
            self.rank_options.title_chars,
            timestamp,
        ))
    }
}

impl Default for Sift {
    fn default() -> Self {
        Self::new()
    }
}
