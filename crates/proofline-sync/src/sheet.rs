//! Review sheet layout: column names, status markers and header-driven cell addressing.

use async_trait::async_trait;
use proofline_core::{Row, RowUpdate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),
    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),
    #[error("header row has no column named {0:?}")]
    MissingColumn(String),
    #[error("invalid spreadsheet URL: {0}")]
    InvalidUrl(String),
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a batch reads rows from and writes results to.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every data row below the header, in sheet order.
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetError>;

    /// Write all updates in one bulk operation.
    async fn write_back(&self, updates: &[RowUpdate]) -> Result<(), SheetError>;

    /// Rows whose status cell equals `marker` exactly.
    async fn fetch_rows_where_status(&self, marker: &str) -> Result<Vec<Row>, SheetError> {
        Ok(rows_with_status(self.fetch_rows().await?, marker))
    }
}

/// Keep rows whose status is exactly `marker`; no trimming or case folding.
pub fn rows_with_status(rows: Vec<Row>, marker: &str) -> Vec<Row> {
    rows.into_iter().filter(|r| r.status == marker).collect()
}

/// Header names of the columns a batch reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSchema {
    pub status: String,
    pub plain_source: String,
    pub markdown_source: String,
    pub plain_translation: String,
    pub markdown_translation: String,
    pub score: String,
    pub content_report: String,
    pub translated_report: String,
    pub markdown_report: String,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            status: "STATUS".into(),
            plain_source: "content".into(),
            markdown_source: "content_markdown".into(),
            plain_translation: "content_translated".into(),
            markdown_translation: "content_markdown_translated".into(),
            score: "SCORE".into(),
            content_report: "CONTENT_TYPO_REPORT".into(),
            translated_report: "TRANSLATED_TYPO_REPORT".into(),
            markdown_report: "MARKDOWN_REPORT".into(),
        }
    }
}

impl SheetSchema {
    /// Resolve every schema column against a header row.
    pub fn locate<S: AsRef<str>>(&self, header: &[S]) -> Result<ColumnMap, SheetError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or_else(|| SheetError::MissingColumn(name.to_string()))
        };
        Ok(ColumnMap {
            status: find(&self.status)?,
            plain_source: find(&self.plain_source)?,
            markdown_source: find(&self.markdown_source)?,
            plain_translation: find(&self.plain_translation)?,
            markdown_translation: find(&self.markdown_translation)?,
            score: find(&self.score)?,
            content_report: find(&self.content_report)?,
            translated_report: find(&self.translated_report)?,
            markdown_report: find(&self.markdown_report)?,
        })
    }
}

/// Status values that select rows for review and mark them done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMarkers {
    pub requested: String,
    pub completed: String,
}

impl Default for StatusMarkers {
    fn default() -> Self {
        Self {
            requested: "1. AI검수요청".into(),
            completed: "2. AI검수완료".into(),
        }
    }
}

/// Zero-based column positions of a located schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub status: usize,
    pub plain_source: usize,
    pub markdown_source: usize,
    pub plain_translation: usize,
    pub markdown_translation: usize,
    pub score: usize,
    pub content_report: usize,
    pub translated_report: usize,
    pub markdown_report: usize,
}

impl ColumnMap {
    /// Build a row from its cells. Missing trailing cells read as empty.
    pub fn row<S: AsRef<str>>(&self, row_index: u32, cells: &[S]) -> Row {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();
        Row {
            row_index,
            plain_source: cell(self.plain_source),
            markdown_source: cell(self.markdown_source),
            plain_translation: cell(self.plain_translation),
            markdown_translation: cell(self.markdown_translation),
            status: cell(self.status),
        }
    }

    /// `(column, value)` pairs an update writes.
    pub fn cells(&self, update: &RowUpdate) -> [(usize, CellValue); 5] {
        [
            (self.score, CellValue::Number(update.score.into())),
            (self.content_report, CellValue::Text(update.content_report.clone())),
            (self.translated_report, CellValue::Text(update.translated_report.clone())),
            (self.markdown_report, CellValue::Text(update.markdown_report.clone())),
            (self.status, CellValue::Text(update.status.clone())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(i64),
    Text(String),
}

/// Data rows of a grid whose first row is the header. Sheet rows are 1-based.
pub fn rows_from_grid<S: AsRef<str>>(
    schema: &SheetSchema,
    grid: &[Vec<S>],
) -> Result<Vec<Row>, SheetError> {
    let Some((header, body)) = grid.split_first() else {
        return Ok(Vec::new());
    };
    let columns = schema.locate(header)?;
    Ok(body
        .iter()
        .enumerate()
        .map(|(i, cells)| columns.row(i as u32 + 2, cells))
        .collect())
}

/// Spreadsheet column letters: 0 → `A`, 25 → `Z`, 26 → `AA`.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 reference to one cell of a named worksheet, e.g. `'Sheet 1'!F12`.
pub fn a1_cell(worksheet: &str, column: usize, row: u32) -> String {
    format!(
        "'{}'!{}{}",
        worksheet.replace('\'', "''"),
        column_letter(column),
        row
    )
}
