//! Styled line types produced by the line collector.

use serde::{Deserialize, Serialize};

/// Span-flag bit: italic.
pub const FLAG_ITALIC: u32 = 1 << 1;
/// Span-flag bit: serifed font.
pub const FLAG_SERIFED: u32 = 1 << 2;
/// Span-flag bit: monospaced font.
pub const FLAG_MONOSPACED: u32 = 1 << 3;
/// Span-flag bit: bold.
pub const FLAG_BOLD: u32 = 1 << 4;

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decompose a 24-bit packed `0xRRGGBB` value.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Pack back into `0xRRGGBB`.
    pub fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// True when every channel is strictly below `threshold`.
    pub fn is_near_black(&self, threshold: u8) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }
}

/// One visual line of text from one page of one document.
///
/// Style attributes (size, font, flags, color) come from the first span of
/// the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledLine {
    /// Source document identifier (file name)
    pub document_id: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Concatenated span text, trimmed
    pub text: String,

    /// Font size rounded to one decimal
    pub font_size: f32,

    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,

    /// Span-flag bitset
    pub style_flags: u32,

    /// Fill color
    pub color: Rgb,
}

impl StyledLine {
    /// Create a line with default styling (12pt, regular, black).
    pub fn new(document_id: impl Into<String>, page_number: u32, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            text: text.into(),
            font_size: 12.0,
            font_name: String::new(),
            style_flags: 0,
            color: Rgb::default(),
        }
    }

    /// Set the font size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    /// Set the span-flag bitset.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.style_flags = flags;
        self
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Font size in tenths of a point, used as an exact map key.
    pub fn size_key(&self) -> i32 {
        size_key(self.font_size)
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Convert a one-decimal font size to an integer key in tenths of a point.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
