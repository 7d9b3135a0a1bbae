//! Google Sheets v4 client for the review worksheet.

use async_trait::async_trait;
use proofline_core::{Row, RowUpdate};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::sheet::{CellValue, SheetError, SheetSchema, SheetStore, a1_cell, rows_from_grid};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Which worksheet to open and how to authenticate.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    /// OAuth bearer token with the spreadsheets scope.
    pub access_token: String,
    pub schema: SheetSchema,
}

impl SheetConfig {
    /// Public Sheets endpoint and the default column names.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            access_token: access_token.into(),
            schema: SheetSchema::default(),
        }
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest {
    value_input_option: &'static str,
    data: Vec<CellRange>,
}

#[derive(Serialize, Debug, PartialEq)]
struct CellRange {
    range: String,
    values: [[CellValue; 1]; 1],
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    total_updated_cells: u64,
}

/// Sheets cells come back as formatted strings, but be lenient with other JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// HTTP client for one worksheet of one spreadsheet.
pub struct SheetClient {
    client: reqwest::Client,
    config: SheetConfig,
}

impl SheetClient {
    /// A trailing slash on the base URL is dropped.
    pub fn new(mut config: SheetConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// `{base}/v4/spreadsheets/{id}/{tail...}` with every segment percent-encoded.
    fn url(&self, tail: &[&str]) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SheetError::InvalidUrl(format!("{}: {e}", self.config.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| {
                SheetError::InvalidUrl(format!("{} cannot carry a path", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.config.spreadsheet_id.as_str()])
            .extend(tail);
        Ok(url)
    }

    async fn fetch_grid(&self) -> Result<Vec<Vec<String>>, SheetError> {
        let url = self.url(&["values", self.config.worksheet.as_str()])?;
        info!(spreadsheet = %self.config.spreadsheet_id, worksheet = %self.config.worksheet, "reading worksheet");

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self.lookup_error(status.as_u16(), body));
        }

        let range: ValueRange = serde_json::from_str(&resp.text().await?)?;
        Ok(range
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    fn lookup_error(&self, status: u16, body: String) -> SheetError {
        match status {
            404 => SheetError::SpreadsheetNotFound(self.config.spreadsheet_id.clone()),
            400 if body.contains("Unable to parse range") => {
                SheetError::WorksheetNotFound(self.config.worksheet.clone())
            }
            _ => SheetError::Server { status, body },
        }
    }

    fn update_request(
        &self,
        header: &[String],
        updates: &[RowUpdate],
    ) -> Result<BatchUpdateRequest, SheetError> {
        let columns = self.config.schema.locate(header)?;
        let data = updates
            .iter()
            .flat_map(|update| {
                columns.cells(update).map(|(column, value)| CellRange {
                    range: a1_cell(&self.config.worksheet, column, update.row_index),
                    values: [[value]],
                })
            })
            .collect();
        Ok(BatchUpdateRequest {
            value_input_option: "RAW",
            data,
        })
    }
}

#[async_trait]
impl SheetStore for SheetClient {
    async fn fetch_rows(&self) -> Result<Vec<Row>, SheetError> {
        let grid = self.fetch_grid().await?;
        let rows = rows_from_grid(&self.config.schema, &grid)?;
        info!(rows = rows.len(), "worksheet rows read");
        Ok(rows)
    }

    async fn write_back(&self, updates: &[RowUpdate]) -> Result<(), SheetError> {
        if updates.is_empty() {
            return Ok(());
        }
        // Header positions may have moved since the read; resolve them again.
        let grid = self.fetch_grid().await?;
        let Some(header) = grid.first() else {
            return Err(SheetError::MissingColumn(self.config.schema.status.clone()));
        };
        let request = self.update_request(header, updates)?;
        let url = self.url(&["values:batchUpdate"])?;

        info!(rows = updates.len(), cells = request.data.len(), "writing review results");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self.lookup_error(status.as_u16(), body));
        }

        let result: BatchUpdateResponse = serde_json::from_str(&resp.text().await?)?;
        if result.total_updated_cells as usize != request.data.len() {
            warn!(
                expected = request.data.len(),
                updated = result.total_updated_cells,
                "bulk write updated an unexpected number of cells"
            );
        }
        info!(cells = result.total_updated_cells, "write complete");
        Ok(())
    }
}
