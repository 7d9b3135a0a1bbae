//! Spreadsheet row types exchanged with the sheet store.

use serde::{Deserialize, Serialize};

use crate::review::{ReviewRequest, ReviewResult, SourcePair};

/// A paragraph/translation row read from the review sheet.
///
/// `row_index` is the 1-based sheet row (the header is row 1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub row_index: u32,
    pub plain_source: String,
    pub markdown_source: String,
    pub plain_translation: String,
    pub markdown_translation: String,
    pub status: String,
}

impl Row {
    /// English source as `content`, Korean translation as `translated`.
    pub fn to_request(&self) -> ReviewRequest {
        ReviewRequest {
            english: SourcePair::new(&self.plain_source, &self.markdown_source),
            korean: SourcePair::new(&self.plain_translation, &self.markdown_translation),
        }
    }
}

/// Result columns written back for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowUpdate {
    pub row_index: u32,
    pub score: u8,
    pub content_report: String,
    pub translated_report: String,
    pub markdown_report: String,
    pub status: String,
}

impl RowUpdate {
    pub fn from_result(row_index: u32, result: &ReviewResult, status: impl Into<String>) -> Self {
        Self {
            row_index,
            score: result.score,
            content_report: result.content_report.clone(),
            translated_report: result.translated_report.clone(),
            markdown_report: result.markdown_report.clone(),
            status: status.into(),
        }
    }
}
