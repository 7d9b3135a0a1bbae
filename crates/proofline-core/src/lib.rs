//! Core types and the deterministic sanitization pipeline for model review replies.

pub mod finding;
pub mod review;
pub mod row;
pub mod sanitize;
pub mod text;

pub use finding::{Finding, parse_finding};
pub use review::{
    DebugBundle, Language, LanguageParseError, ReportTrace, ReviewRequest, ReviewResult,
    SourcePair,
};
pub use row::{Row, RowUpdate};
pub use sanitize::{Sanitized, sanitize};
