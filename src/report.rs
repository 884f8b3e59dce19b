//! Output documents and JSON serialization.

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Outline, OutlineEntry, PersonaQuery, RankedSection};

/// Format of `processing_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Outline of one document as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineReport {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl From<Outline> for OutlineReport {
    fn from(outline: Outline) -> Self {
        Self {
            title: outline.title,
            outline: outline.entries,
        }
    }
}

/// Batch metadata of a ranking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingMetadata {
    /// Document file names in input order
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// Local time, `YYYY-MM-DDTHH:MM:SS.ffffff`
    pub processing_timestamp: String,
}

/// One ranked section, summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: u32,
}

/// One ranked section, full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Ranking result of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: RankingMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl RankingReport {
    /// Assemble a report with an explicit timestamp.
    pub fn new(
        input_documents: Vec<String>,
        query: &PersonaQuery,
        ranked: &[RankedSection],
        title_chars: usize,
        processing_timestamp: impl Into<String>,
    ) -> Self {
        let extracted_sections = ranked
            .iter()
            .map(|section| ExtractedSection {
                document: section.block.document_id.clone(),
                section_title: section.section_title(title_chars),
                importance_rank: section.rank,
                page_number: section.block.page_number,
            })
            .collect();

        let subsection_analysis = ranked
            .iter()
            .map(|section| SubsectionAnalysis {
                document: section.block.document_id.clone(),
                refined_text: section.refined_text().to_string(),
                page_number: section.block.page_number,
            })
            .collect();

        Self {
            metadata: RankingMetadata {
                input_documents,
                persona: query.persona.clone(),
                job_to_be_done: query.job_to_be_done.clone(),
                processing_timestamp: processing_timestamp.into(),
            },
            extracted_sections,
            subsection_analysis,
        }
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Serialize a report to JSON.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Serialize a report and write it to `path`, creating parent directories.
pub fn write_json<T: Serialize, P: AsRef<Path>>(
    value: &T,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(value, format)?)?;
    Ok(())
}
