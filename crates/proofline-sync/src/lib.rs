//! Spreadsheet side of Proofline: sheet layout, the batch runner and (with `http`) the Sheets client.

pub mod batch;
pub mod sheet;

#[cfg(feature = "http")]
pub mod http;

pub use batch::{BatchOptions, BatchSummary, RawRowResult, run_sheet_review};
#[cfg(feature = "http")]
pub use http::{SheetClient, SheetConfig};
pub use sheet::{SheetError, SheetSchema, SheetStore, StatusMarkers};
