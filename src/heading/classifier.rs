//! Heading grammars.
//!
//! Two independent predicates decide whether a line may be a heading:
//! a narrative grammar keyed on fiction markers ("Prologue", "Chapter 3")
//! and a structural grammar for short, bold, large academic headings. A line
//! is a candidate when either accepts it.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{HeadingCandidate, MatchKind, StyledLine};
use crate::options::OutlineOptions;

/// Maximum words in a structural heading.
const MAX_HEADING_WORDS: usize = 9;

/// Compiled patterns shared by every classifier.
struct Grammar {
    narrative: Regex,
    formula: Regex,
    caption: Regex,
    only_symbols: Regex,
    any_symbol: Regex,
}

impl Grammar {
    fn new() -> Self {
        Self {
            narrative: Regex::new(
                r"(?i)^(Prologue|Chapter\s+\d+|Trigger Warning|Playlist|Epilogue|Act\s+\w+|Part\s+\w+)\b",
            )
            .unwrap(),
            formula: Regex::new(r"[=+\-*/^]|sin|cos|tan|log|\$|\\[a-zA-Z]+\{.*?\}").unwrap(),
            caption: Regex::new(r"(?i)\b(Table|Figure|Fig\.?|Listing)\s*\d+").unwrap(),
            only_symbols: Regex::new(r"^[\d\s\W]+$").unwrap(),
            any_symbol: Regex::new(r#"[():{}\[\]<>\d@#^+=_|~$%*"';]"#).unwrap(),
        }
    }
}

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(Grammar::new)
}

/// True if the trimmed text starts with a narrative marker.
pub fn is_narrative_heading(text: &str) -> bool {
    grammar().narrative.is_match(text.trim())
}

/// True if the text looks like math: operators, `$`, `\cmd{..}`, or a
/// trig/log name anywhere (case-sensitive).
pub fn is_formula(text: &str) -> bool {
    grammar().formula.is_match(text)
}

/// True if the text contains a "Table 3" / "Fig. 2" style caption label.
pub fn is_caption(text: &str) -> bool {
    grammar().caption.is_match(text)
}

/// True if the text is all digits/symbols, or contains any digit or any of
/// `( ) : { } [ ] < > @ # ^ + = _ | ~ $ % * " ' ;`.
///
/// The second rule also rejects real headings such as "Section 2: Results".
pub fn is_number_or_symbols(text: &str) -> bool {
    let g = grammar();
    g.only_symbols.is_match(text) || g.any_symbol.is_match(text)
}

/// True if the first non-whitespace character is uppercase.
pub fn starts_with_uppercase(text: &str) -> bool {
    text.trim_start()
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

/// True if the font name says bold or any bit of `mask` is set in `flags`.
pub fn is_bold(font_name: &str, flags: u32, mask: u32) -> bool {
    font_name.to_lowercase().contains("bold") || flags & mask != 0
}

/// Lexical half of the structural grammar: length, shape and first letter.
pub fn is_structural_heading(text: &str) -> bool {
    let text = text.trim();
    let words = text.split_whitespace().count();

    (1..=MAX_HEADING_WORDS).contains(&words)
        && !is_formula(text)
        && !is_caption(text)
        && !is_number_or_symbols(text)
        && starts_with_uppercase(text)
}

/// Applies both grammars to styled lines.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    options: OutlineOptions,
}

impl HeadingClassifier {
    /// Create a classifier with the given options.
    pub fn new(options: OutlineOptions) -> Self {
        Self { options }
    }

    /// Decide which grammars accept `line`.
    pub fn classify(&self, line: &StyledLine) -> MatchKind {
        if line.text.trim().is_empty() {
            return MatchKind::None;
        }

        let narrative = is_narrative_heading(&line.text);
        let structural = is_structural_heading(&line.text)
            && is_bold(&line.font_name, line.style_flags, self.options.bold_flag_mask)
            && line.font_size >= self.options.min_font_size;

        MatchKind::from_flags(narrative, structural)
    }

    /// Keep the candidate lines, in input order.
    pub fn candidates<I>(&self, lines: I) -> Vec<HeadingCandidate>
    where
        I: IntoIterator<Item = StyledLine>,
    {
        lines
            .into_iter()
            .filter_map(|line| {
                let kind = self.classify(&line);
                kind.is_candidate().then(|| HeadingCandidate::new(line, kind))
            })
            .collect()
    }
}
