//! Document reading: PDF pages to styled line records.
//!
//! The [`DocumentReader`] trait is the seam between the pipelines and the
//! PDF library. [`PdfReader`] implements it with lopdf; tests substitute
//! in-memory readers.

mod backend;
mod content;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use content::{extract_lines, style_flags};

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One run of text sharing font, size, flags and color.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    /// Span text as shown
    pub text: String,
    /// Effective font size in points
    pub size: f32,
    /// Base font name
    pub font: String,
    /// Span-flag bitset (see [`crate::model::FLAG_BOLD`] and friends)
    pub flags: u32,
    /// Fill color packed as `0xRRGGBB`
    pub color: u32,
}

impl SpanRecord {
    /// Create a span with black fill and no flags.
    pub fn new(text: impl Into<String>, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size,
            font: font.into(),
            flags: 0,
            color: 0,
        }
    }

    /// Set the span-flag bitset.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the packed fill color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// One visual line: a non-empty ordered list of spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineRecord {
    /// Spans in content-stream order
    pub spans: Vec<SpanRecord>,
}

impl LineRecord {
    /// Create a line from spans.
    pub fn new(spans: Vec<SpanRecord>) -> Self {
        Self { spans }
    }
}

/// Lines of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub number: u32,
    /// Lines in reading order
    pub lines: Vec<LineRecord>,
}

impl PageRecord {
    /// Create a page from lines.
    pub fn new(number: u32, lines: Vec<LineRecord>) -> Self {
        Self { number, lines }
    }
}

/// Source of styled line records for a document.
pub trait DocumentReader: Send + Sync {
    /// Read every page of the document at `path`.
    ///
    /// Implementations must release the document before returning.
    fn read_pages(&self, path: &Path) -> Result<Vec<PageRecord>>;
}

/// [`DocumentReader`] for PDF files, backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Read pages from in-memory PDF bytes.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Vec<PageRecord>> {
        check_pdf_header(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        read_backend(&backend)
    }
}

impl DocumentReader for PdfReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<PageRecord>> {
        let mut header = [0u8; 16];
        let read = File::open(path)?.read(&mut header)?;
        check_pdf_header(&header[..read])?;

        let backend = LopdfBackend::load_file(path)?;
        log::debug!("Loaded {} (PDF {})", path.display(), backend.version());
        read_backend(&backend)
    }
}

/// Walk every page of a backend.
pub fn read_backend(backend: &dyn PdfBackend) -> Result<Vec<PageRecord>> {
    let mut pages = Vec::new();

    for (number, page_id) in backend.pages() {
        let fonts = backend.page_fonts(page_id)?;
        let raw = backend.page_content(page_id)?;
        let ops = backend
            .decode_content(&raw)
            .map_err(|e| Error::Content {
                page: number,
                message: e.to_string(),
            })?;

        let lines = extract_lines(backend, page_id, &ops, &fonts);
        log::debug!("Page {}: {} lines", number, lines.len());
        pages.push(PageRecord::new(number, lines));
    }

    Ok(pages)
}

/// Validate the `%PDF-x.y` header and return the version string.
pub fn check_pdf_header(data: &[u8]) -> Result<String> {
    const MAGIC: &[u8] = b"%PDF-";

    if data.len() < MAGIC.len() + 3 || !data.starts_with(MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&data[MAGIC.len()..MAGIC.len() + 3]).to_string();
    let bytes = version.as_bytes();
    let well_formed = bytes.len() == 3
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit();
    if !well_formed {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

/// List the PDF files directly inside `dir`, sorted by file name.
pub fn discover_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_pdf_path(path))
        .collect();

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// True if the path has a `.pdf` extension (any case).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Document identifier for a path: its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
