//! JSON report of a processed document.

use serde::Serialize;

use crate::error::Result;
use crate::model::{Document, DocumentMetadata, GridCell, PageOutcome};

use super::ExtractionStats;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    metadata: &'a DocumentMetadata,
    elapsed_ms: i64,
    stats: ExtractionStats,
    pages: Vec<PageReport<'a>>,
}

#[derive(Serialize)]
struct PageReport<'a> {
    page_id: u32,
    image_name: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    degenerate: bool,
    lines: Vec<LineReport<'a>>,
}

#[derive(Serialize)]
struct LineReport<'a> {
    row: usize,
    text: &'a str,
    fragments: Vec<FragmentReport<'a>>,
}

#[derive(Serialize)]
struct FragmentReport<'a> {
    text: &'a str,
    x: f64,
    y: f64,
    cell: GridCell,
}

impl<'a> PageReport<'a> {
    fn from_outcome(outcome: &'a PageOutcome) -> Self {
        match &outcome.result {
            Ok(page) => Self {
                page_id: outcome.page_id,
                image_name: &outcome.image_name,
                status: "ok",
                error: None,
                degenerate: page.degenerate,
                lines: page
                    .lines
                    .iter()
                    .zip(&page.formatted)
                    .map(|(line, text)| LineReport {
                        row: line.row,
                        text,
                        fragments: line
                            .fragments
                            .iter()
                            .map(|f| FragmentReport {
                                text: &f.fragment.text,
                                x: f.fragment.x,
                                y: f.fragment.y,
                                cell: f.cell,
                            })
                            .collect(),
                    })
                    .collect(),
            },
            Err(e) => Self {
                page_id: outcome.page_id,
                image_name: &outcome.image_name,
                status: "failed",
                error: Some(e.to_string()),
                degenerate: false,
                lines: Vec::new(),
            },
        }
    }
}

/// Convert a document to a JSON report.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let report = DocumentReport {
        metadata: &doc.metadata,
        elapsed_ms: doc.metadata.elapsed_ms(),
        stats: doc.stats(),
        pages: doc.pages.iter().map(PageReport::from_outcome).collect(),
    };

    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&report)?,
        JsonFormat::Compact => serde_json::to_string(&report)?,
    };
    Ok(json)
}
