//! Sheet batch review: read requested rows, review each, write all results at once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use proofline_ai::{Generator, Reviewer};
use proofline_core::{ReviewResult, RowUpdate};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::sheet::{SheetError, SheetStore, StatusMarkers, rows_with_status};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause between consecutive model calls.
    pub pacing: Duration,
    /// Keep each row's raw reply and final result in the summary.
    pub collect_raw: bool,
    pub markers: StatusMarkers,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(500),
            collect_raw: false,
            markers: StatusMarkers::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RawRowResult {
    pub row_index: u32,
    pub raw: Value,
    pub result: ReviewResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub target_rows: usize,
    pub processed_rows: usize,
    pub raw_results: Vec<RawRowResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Review every row whose status is exactly `options.markers.requested`.
///
/// `progress(done, total)` is called after each reviewed row. All updates are
/// flushed with a single [`SheetStore::write_back`] after the last row; nothing
/// is written when no row is requested.
#[instrument(skip_all)]
pub async fn run_sheet_review<S, G>(
    store: &S,
    reviewer: &Reviewer<G>,
    options: &BatchOptions,
    mut progress: impl FnMut(usize, usize),
) -> Result<BatchSummary, SheetError>
where
    S: SheetStore + ?Sized,
    G: Generator,
{
    let started_at = Utc::now();
    // One read serves both counts, so this does not go through
    // `fetch_rows_where_status`; the selection rule is shared with it.
    let rows = store.fetch_rows().await?;
    let total_rows = rows.len();
    let targets = rows_with_status(rows, &options.markers.requested);
    let target_rows = targets.len();
    info!(total_rows, target_rows, marker = %options.markers.requested, "rows selected for review");

    let mut updates = Vec::with_capacity(target_rows);
    let mut raw_results = Vec::new();

    for (i, row) in targets.iter().enumerate() {
        let (result, debug) = reviewer.review_row_both(row).await;
        updates.push(RowUpdate::from_result(
            row.row_index,
            &result,
            &options.markers.completed,
        ));
        if options.collect_raw {
            raw_results.push(RawRowResult {
                row_index: row.row_index,
                raw: debug.raw,
                result,
            });
        }
        progress(i + 1, target_rows);

        if i + 1 < target_rows && !options.pacing.is_zero() {
            tokio::time::sleep(options.pacing).await;
        }
    }

    if !updates.is_empty() {
        store.write_back(&updates).await?;
    }

    info!(processed_rows = updates.len(), "sheet review finished");
    Ok(BatchSummary {
        total_rows,
        target_rows,
        processed_rows: updates.len(),
        raw_results,
        started_at,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{SheetSchema, rows_from_grid};
    use async_trait::async_trait;
    use proofline_ai::{GenerateError, RetryPolicy};
    use proofline_core::Row;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MemorySheet {
        grid: Vec<Vec<String>>,
        writes: Mutex<Vec<Vec<RowUpdate>>>,
    }

    impl MemorySheet {
        fn new(rows: &[[&str; 5]]) -> Self {
            let schema = SheetSchema::default();
            let mut grid = vec![vec![
                schema.status,
                schema.plain_source,
                schema.markdown_source,
                schema.plain_translation,
                schema.markdown_translation,
                schema.score,
                schema.content_report,
                schema.translated_report,
                schema.markdown_report,
            ]];
            grid.extend(rows.iter().map(|r| r.map(String::from).to_vec()));
            Self {
                grid,
                writes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SheetStore for MemorySheet {
        async fn fetch_rows(&self) -> Result<Vec<Row>, SheetError> {
            rows_from_grid(&SheetSchema::default(), &self.grid)
        }

        async fn write_back(&self, updates: &[RowUpdate]) -> Result<(), SheetError> {
            self.writes.lock().unwrap().push(updates.to_vec());
            Ok(())
        }
    }

    struct Canned {
        reply: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Generator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn reviewer(reply: &str) -> Reviewer<Canned> {
        Reviewer::new(
            Canned {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            },
            RetryPolicy::immediate(1),
        )
    }

    fn options(collect_raw: bool) -> BatchOptions {
        BatchOptions {
            pacing: Duration::ZERO,
            collect_raw,
            ..Default::default()
        }
    }

    const REQUESTED: &str = "1. AI검수요청";

    #[tokio::test]
    async fn only_requested_rows_are_reviewed_and_written_once() {
        let sheet = MemorySheet::new(&[
            [REQUESTED, "He went to scool.", "He went to scool.", "그는 갔다.", "그는 갔다."],
            ["2. AI검수완료", "Done.", "Done.", "끝.", "끝."],
            [" 1. AI검수요청", "Skip.", "Skip.", "건너뜀.", "건너뜀."],
            [REQUESTED, "All good.", "All good.", "좋다.", "좋다."],
        ]);
        let reviewer = reviewer(
            r#"{"suspicion_score": 2, "content_typo_report": "- 'scool' → 'school': spelling"}"#,
        );
        let mut calls = Vec::new();

        let summary = run_sheet_review(&sheet, &reviewer, &options(false), |done, total| {
            calls.push((done, total))
        })
        .await
        .unwrap();

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.target_rows, 2);
        assert_eq!(summary.processed_rows, 2);
        assert!(summary.raw_results.is_empty());
        assert_eq!(calls, vec![(1, 2), (2, 2)]);

        let writes = sheet.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let updates = &writes[0];
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].row_index, 2);
        assert_eq!(updates[0].score, 2);
        assert_eq!(updates[0].content_report, "- 'scool' → 'school': spelling");
        assert_eq!(updates[0].status, "2. AI검수완료");
        assert_eq!(updates[1].row_index, 5);
        assert_eq!(updates[1].score, 1);
        assert!(updates[1].content_report.is_empty());
    }

    #[tokio::test]
    async fn raw_results_collected_on_request() {
        let sheet = MemorySheet::new(&[[REQUESTED, "Fine.", "Fine.", "좋다.", "좋다."]]);
        let reviewer = reviewer("not json at all");

        let summary = run_sheet_review(&sheet, &reviewer, &options(true), |_, _| {})
            .await
            .unwrap();

        assert_eq!(summary.raw_results.len(), 1);
        let raw = &summary.raw_results[0];
        assert_eq!(raw.row_index, 2);
        assert_eq!(raw.raw, Value::String("not json at all".into()));
        assert_eq!(raw.result.score, 5);
        assert!(summary.finished_at >= summary.started_at);
    }

    #[tokio::test]
    async fn nothing_requested_means_no_write_and_no_calls() {
        let sheet = MemorySheet::new(&[["2. AI검수완료", "Done.", "Done.", "끝.", "끝."]]);
        let reviewer = reviewer("{}");

        let summary = run_sheet_review(&sheet, &reviewer, &options(false), |_, _| {
            panic!("no progress expected")
        })
        .await
        .unwrap();

        assert_eq!(summary.total_rows, 1);
        assert_eq!(summary.target_rows, 0);
        assert_eq!(summary.processed_rows, 0);
        assert!(sheet.writes.lock().unwrap().is_empty());
        assert_eq!(reviewer_calls(&reviewer), 0);
    }

    #[tokio::test]
    async fn missing_column_aborts_before_review() {
        let mut sheet = MemorySheet::new(&[[REQUESTED, "a.", "a.", "가.", "가."]]);
        sheet.grid[0].retain(|h| h != "SCORE");
        let reviewer = reviewer("{}");

        let err = run_sheet_review(&sheet, &reviewer, &options(false), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, SheetError::MissingColumn(ref c) if c == "SCORE"));
        assert_eq!(reviewer_calls(&reviewer), 0);
    }

    #[tokio::test]
    async fn status_filter_is_exact() {
        let sheet = MemorySheet::new(&[
            [REQUESTED, "a.", "a.", "가.", "가."],
            ["1. AI검수요청 ", "b.", "b.", "나.", "나."],
            ["", "c.", "c.", "다.", "다."],
        ]);
        let rows = sheet.fetch_rows_where_status(REQUESTED).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_index, 2);

        let reviewer = reviewer("{}");
        let summary = run_sheet_review(&sheet, &reviewer, &options(false), |_, _| {})
            .await
            .unwrap();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.target_rows, rows.len());
        let writes = sheet.writes.lock().unwrap();
        assert_eq!(writes[0][0].row_index, rows[0].row_index);
    }

    fn reviewer_calls(reviewer: &Reviewer<Canned>) -> usize {
        reviewer.generator().calls.load(Ordering::SeqCst)
    }
}
