//! Content-stream walker.
//!
//! Runs a small text-state machine over the operations of one page and
//! groups the shown strings into visual lines. Lines keep content-stream
//! order; a new line starts whenever the baseline moves.

use super::backend::{
    get_number_from_value, BackendFontInfo, ContentOp, PageId, PdfBackend, PdfValue,
    DESCRIPTOR_FIXED_PITCH, DESCRIPTOR_FORCE_BOLD, DESCRIPTOR_ITALIC, DESCRIPTOR_SERIF,
};
use super::{LineRecord, SpanRecord};
use crate::model::{FLAG_BOLD, FLAG_ITALIC, FLAG_MONOSPACED, FLAG_SERIFED};

/// The identity text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Baseline shift, as a fraction of the font size, that starts a new line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// TJ adjustment (thousandths of text space) treated as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Derive span flags from a base font name and font-descriptor flags.
pub fn style_flags(base_font: &str, descriptor_flags: u32) -> u32 {
    let lower = base_font.to_lowercase();
    let mut flags = 0;

    if lower.contains("bold")
        || lower.contains("black")
        || lower.contains("heavy")
        || descriptor_flags & DESCRIPTOR_FORCE_BOLD != 0
    {
        flags |= FLAG_BOLD;
    }
    if lower.contains("italic")
        || lower.contains("oblique")
        || descriptor_flags & DESCRIPTOR_ITALIC != 0
    {
        flags |= FLAG_ITALIC;
    }
    if descriptor_flags & DESCRIPTOR_SERIF != 0 {
        flags |= FLAG_SERIFED;
    }
    if descriptor_flags & DESCRIPTOR_FIXED_PITCH != 0 {
        flags |= FLAG_MONOSPACED;
    }
    flags
}

/// Pack 0..1 color components into `0xRRGGBB`.
fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

fn pack_cmyk(c: f32, m: f32, y: f32, k: f32) -> u32 {
    let k = k.clamp(0.0, 1.0);
    pack_rgb(
        (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
        (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
        (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
    )
}

/// Fill color from the numeric operands of a color operator.
///
/// One operand is gray, three are RGB, four are CMYK. Pattern names and
/// other shapes leave the color unchanged.
fn color_from_operands(operands: &[PdfValue]) -> Option<u32> {
    let nums: Vec<f32> = operands.iter().filter_map(get_number_from_value).collect();
    match nums.as_slice() {
        [v] => Some(pack_rgb(*v, *v, *v)),
        [r, g, b] => Some(pack_rgb(*r, *g, *b)),
        [c, m, y, k] => Some(pack_cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    flags: u32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    leading: f32,
    fill_color: u32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            flags: 0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            leading: 0.0,
            fill_color: 0,
        }
    }
}

impl TextState {
    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Font size scaled by the vertical component of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, operands: &[PdfValue]) {
        let vals: Vec<f32> = operands.iter().filter_map(get_number_from_value).collect();
        if let [a, b, c, d, e, f] = vals.as_slice() {
            self.text_matrix = [*a, *b, *c, *d, *e, *f];
            self.line_matrix = self.text_matrix;
        }
    }

    fn set_font(&mut self, key: &[u8], fonts: &[BackendFontInfo], size: f32) {
        self.font_key = key.to_vec();
        self.font_size = size;
        match fonts.iter().find(|f| f.key == key) {
            Some(info) => {
                self.font_name = info.base_font.clone();
                self.flags = style_flags(&info.base_font, info.descriptor_flags);
            }
            None => {
                self.font_name = String::from_utf8_lossy(key).to_string();
                self.flags = style_flags(&self.font_name, 0);
            }
        }
    }

    fn span(&self, text: String) -> SpanRecord {
        SpanRecord {
            text,
            size: self.effective_font_size(),
            font: self.font_name.clone(),
            flags: self.flags,
            color: self.fill_color,
        }
    }
}

/// Collects spans into lines, breaking on baseline changes.
#[derive(Default)]
struct LineAssembler {
    lines: Vec<LineRecord>,
    current: Vec<SpanRecord>,
    baseline: Option<f32>,
}

impl LineAssembler {
    fn push(&mut self, span: SpanRecord, y: f32) {
        let tolerance = BASELINE_TOLERANCE * span.size.max(1.0);
        match self.baseline {
            Some(baseline) if (y - baseline).abs() <= tolerance => {}
            _ => {
                self.flush();
                self.baseline = Some(y);
            }
        }
        self.current.push(span);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(LineRecord {
                spans: std::mem::take(&mut self.current),
            });
        }
    }

    fn finish(mut self) -> Vec<LineRecord> {
        self.flush();
        self.lines
    }
}

/// Decode a `TJ` array, inserting a space at large negative adjustments.
fn decode_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page: PageId,
    font_key: &[u8],
) -> String {
    let mut combined = String::new();
    for item in arr {
        match item {
            PdfValue::Str(bytes) => {
                combined.push_str(&backend.decode_text(page, font_key, bytes));
            }
            other => {
                if let Some(adjustment) = get_number_from_value(other) {
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                    {
                        combined.push(' ');
                    }
                }
            }
        }
    }
    combined
}

/// Walk the operations of one page and return its visual lines.
pub fn extract_lines(
    backend: &dyn PdfBackend,
    page: PageId,
    ops: &[ContentOp],
    fonts: &[BackendFontInfo],
) -> Vec<LineRecord> {
    let mut state = TextState::default();
    let mut color_stack: Vec<u32> = Vec::new();
    let mut assembler = LineAssembler::default();
    let mut in_text_block = false;

    for op in ops {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => color_stack.push(state.fill_color),
            "Q" => {
                if let Some(color) = color_stack.pop() {
                    state.fill_color = color;
                }
            }
            "g" | "rg" | "k" | "sc" | "scn" => {
                if let Some(color) = color_from_operands(operands) {
                    state.fill_color = color;
                }
            }
            "BT" => {
                in_text_block = true;
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if let [PdfValue::Name(key), size, ..] = operands {
                    let size = get_number_from_value(size).unwrap_or(12.0);
                    state.set_font(key, fonts, size);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number_from_value) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    let tx = get_number_from_value(tx).unwrap_or(0.0);
                    let ty = get_number_from_value(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "Tm" => state.set_matrix(operands),
            "T*" => state.next_line(),
            "Tj" | "TJ" | "'" | "\"" => {
                if matches!(op.operator.as_str(), "'" | "\"") {
                    state.next_line();
                }
                if !in_text_block {
                    continue;
                }
                let operand = match op.operator.as_str() {
                    "\"" => operands.get(2),
                    _ => operands.first(),
                };
                let text = match operand {
                    Some(PdfValue::Str(bytes)) => backend.decode_text(page, &state.font_key, bytes),
                    Some(PdfValue::Array(arr)) => {
                        decode_tj_array(arr, backend, page, &state.font_key)
                    }
                    _ => String::new(),
                };
                if !text.is_empty() {
                    assembler.push(state.span(text), state.y());
                }
            }
            _ => {}
        }
    }

    assembler.finish()
}
