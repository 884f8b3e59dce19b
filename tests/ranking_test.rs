//! Integration tests for batch ranking over an in-memory reader.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pdfsift::error::Result;
use pdfsift::reader::{LineRecord, SpanRecord};
use pdfsift::{
    to_json, DocumentReader, Error, JsonFormat, PageRecord, PersonaQuery, RankOptions, Sift,
};

const TIMESTAMP: &str = "2025-07-10T15:31:22.632389";

#[derive(Default, Clone)]
struct MockReader {
    documents: HashMap<String, Vec<PageRecord>>,
}

impl MockReader {
    fn with(mut self, name: &str, lines: &[(u32, &str, f32)]) -> Self {
        let mut pages: Vec<PageRecord> = Vec::new();
        for &(page, text, size) in lines {
            let record = LineRecord::new(vec![SpanRecord::new(text, size, "Helvetica")]);
            match pages.last_mut() {
                Some(last) if last.number == page => last.lines.push(record),
                _ => pages.push(PageRecord::new(page, vec![record])),
            }
        }
        self.documents.insert(name.to_string(), pages);
        self
    }
}

impl DocumentReader for MockReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<PageRecord>> {
        let name = pdfsift::reader::document_id(path);
        self.documents
            .get(&name)
            .cloned()
            .ok_or(Error::UnknownFormat)
    }
}

fn travel_query() -> PersonaQuery {
    PersonaQuery::new(
        "Travel Planner",
        "Plan a trip of 4 days for a group of 10 college friends.",
    )
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from(format!("/input/{}", n))).collect()
}

fn travel_reader() -> MockReader {
    MockReader::default()
        .with(
            "cities.pdf",
            &[
                (1, "Comprehensive Guide to Major Cities", 20.0),
                (2, "Nice is a lively city with many museums", 12.0),
                (3, "Marseille offers museums and old harbours", 11.0),
            ],
        )
        .with(
            "things.pdf",
            &[
                (1, "Book a beachfront villa for the whole group", 12.0),
                (4, "Nightlife for college friends on a trip", 12.0),
            ],
        )
        .with(
            "finance.pdf",
            &[(1, "Quarterly revenue grew by eight percent", 12.0)],
        )
}

#[test]
fn test_travel_batch_ranking() {
    let sift = Sift::new().with_reader(travel_reader());
    let docs = paths(&["cities.pdf", "things.pdf", "finance.pdf"]);
    let report = sift.rank_at(&docs, &travel_query(), TIMESTAMP).unwrap();

    assert_eq!(
        report.metadata.input_documents,
        vec!["cities.pdf", "things.pdf", "finance.pdf"]
    );
    assert_eq!(report.metadata.persona, "Travel Planner");
    assert_eq!(report.extracted_sections.len(), 5);

    let ranks: Vec<_> = report
        .extracted_sections
        .iter()
        .map(|s| s.importance_rank)
        .collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

    let top = &report.subsection_analysis[0];
    assert_eq!(top.document, "things.pdf");
    assert_eq!(top.refined_text, "Nightlife for college friends on a trip");
    assert_eq!(top.page_number, 4);

    assert_eq!(report.subsection_analysis[1].document, "things.pdf");

    // Unrelated lines tie at zero and fall back to font size, then input order
    let tail: Vec<_> = report.extracted_sections[2..]
        .iter()
        .map(|s| s.document.as_str())
        .collect();
    assert_eq!(tail, vec!["cities.pdf", "cities.pdf", "finance.pdf"]);
    assert_eq!(
        report.extracted_sections[2].section_title,
        "Comprehensive Guide to Major Cities"
    );
}

#[test]
fn test_villa_ranks_above_revenue() {
    let reader = MockReader::default()
        .with("a.pdf", &[(1, "Quarterly revenue grew by eight percent", 12.0)])
        .with("b.pdf", &[(1, "Book a beachfront villa for the group", 12.0)]);

    let report = Sift::new()
        .with_reader(reader)
        .rank_at(&paths(&["a.pdf", "b.pdf"]), &travel_query(), TIMESTAMP)
        .unwrap();

    assert_eq!(report.extracted_sections[0].document, "b.pdf");
    assert_eq!(report.extracted_sections[1].document, "a.pdf");
}

#[test]
fn test_beachfront_villa_outranks_revenue() {
    let reader = MockReader::default()
        .with(
            "finance.pdf",
            &[(1, "Quarterly revenue increased across all regions", 12.0)],
        )
        .with(
            "villas.pdf",
            &[(3, "Book a beachfront villa for ten friends for four days", 12.0)],
        );

    let report = Sift::new()
        .with_reader(reader)
        .rank_at(
            &paths(&["finance.pdf", "villas.pdf"]),
            &travel_query(),
            TIMESTAMP,
        )
        .unwrap();

    let order: Vec<_> = report
        .extracted_sections
        .iter()
        .map(|s| (s.document.as_str(), s.importance_rank, s.page_number))
        .collect();
    assert_eq!(order, vec![("villas.pdf", 1, 3), ("finance.pdf", 2, 1)]);
}

#[test]
fn test_empty_query_still_ranks() {
    let report = Sift::new()
        .with_reader(travel_reader())
        .rank_at(
            &paths(&["cities.pdf", "things.pdf"]),
            &PersonaQuery::new("", ""),
            TIMESTAMP,
        )
        .unwrap();

    // Every score is zero, so font size then input order decides
    assert_eq!(report.extracted_sections.len(), 5);
    assert_eq!(
        report.extracted_sections[0].section_title,
        "Comprehensive Guide to Major Cities"
    );
    assert_eq!(report.metadata.persona, "");
}

#[test]
fn test_min_words_and_title_chars_options() {
    let reader = MockReader::default().with(
        "short.pdf",
        &[(1, "Beaches", 12.0), (2, "Nightlife for friends", 12.0)],
    );
    let options = RankOptions::new().with_min_words(1).with_title_chars(9);

    let report = Sift::new()
        .with_reader(reader)
        .with_rank_options(options)
        .rank_at(&paths(&["short.pdf"]), &travel_query(), TIMESTAMP)
        .unwrap();

    let titles: Vec<_> = report
        .extracted_sections
        .iter()
        .map(|s| s.section_title.as_str())
        .collect();
    assert_eq!(titles, vec!["Nightlife", "Beaches"]);
    assert_eq!(report.subsection_analysis[0].refined_text, "Nightlife for friends");
}

#[test]
fn test_top_k_larger_than_pool() {
    let sift = Sift::new().with_reader(travel_reader()).with_top_k(50);
    let docs = paths(&["cities.pdf", "things.pdf", "finance.pdf"]);
    let report = sift.rank_at(&docs, &travel_query(), TIMESTAMP).unwrap();

    // Every line of three or more words
    assert_eq!(report.extracted_sections.len(), 6);
}

#[test]
fn test_empty_batch_report() {
    let reader = MockReader::default().with("empty.pdf", &[]);
    let report = Sift::new()
        .with_reader(reader)
        .rank_at(&paths(&["empty.pdf"]), &travel_query(), TIMESTAMP)
        .unwrap();

    assert!(report.extracted_sections.is_empty());
    assert!(report.subsection_analysis.is_empty());

    let json = to_json(&report, JsonFormat::Compact).unwrap();
    assert!(json.contains(r#""extracted_sections":[],"subsection_analysis":[]"#));
}

#[test]
fn test_parallel_matches_sequential() {
    let docs = paths(&["cities.pdf", "things.pdf", "finance.pdf"]);
    let parallel = Sift::new()
        .with_reader(travel_reader())
        .rank_at(&docs, &travel_query(), TIMESTAMP)
        .unwrap();
    let sequential = Sift::new()
        .with_reader(travel_reader())
        .sequential()
        .rank_at(&docs, &travel_query(), TIMESTAMP)
        .unwrap();

    assert_eq!(parallel, sequential);
}

#[test]
fn test_ranking_is_deterministic() {
    let docs = paths(&["things.pdf", "cities.pdf"]);
    let sift = Sift::new().with_reader(travel_reader());

    let first = sift.rank_at(&docs, &travel_query(), TIMESTAMP).unwrap();
    let second = sift.rank_at(&docs, &travel_query(), TIMESTAMP).unwrap();
    assert_eq!(
        to_json(&first, JsonFormat::Pretty).unwrap(),
        to_json(&second, JsonFormat::Pretty).unwrap()
    );
}

#[test]
fn test_strict_and_lenient_missing_document() {
    let docs = paths(&["things.pdf", "missing.pdf"]);

    let strict = Sift::new()
        .with_reader(travel_reader())
        .rank_at(&docs, &travel_query(), TIMESTAMP);
    assert!(matches!(strict, Err(Error::UnknownFormat)));

    let lenient = Sift::new()
        .with_reader(travel_reader())
        .with_rank_options(RankOptions::new().lenient())
        .rank_at(&docs, &travel_query(), TIMESTAMP)
        .unwrap();
    assert_eq!(lenient.extracted_sections.len(), 2);
    assert!(lenient
        .extracted_sections
        .iter()
        .all(|s| s.document == "things.pdf"));
}

#[test]
fn test_section_title_truncation() {
    let long = "Explore the hidden coves and beaches of the coast with a group of college friends over four days";
    let reader = MockReader::default().with("long.pdf", &[(2, long, 12.0)]);

    let report = Sift::new()
        .with_reader(reader)
        .rank_at(&paths(&["long.pdf"]), &travel_query(), TIMESTAMP)
        .unwrap();

    let section = &report.extracted_sections[0];
    assert_eq!(section.section_title.chars().count(), 80);
    assert!(long.starts_with(&section.section_title));
    assert_eq!(report.subsection_analysis[0].refined_text, long);
}
