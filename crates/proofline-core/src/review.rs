//! Review request/result types shared by the reviewer, the sheet runner and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest and highest suspicion score a result may carry.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Score given to results that still carry findings but came back as `1`.
pub const FLAGGED_FLOOR: u8 = 3;

/// Language of a reviewed passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown language tag: {0} (expected 'ko' or 'en')")]
pub struct LanguageParseError(pub String);

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Self::Korean),
            "en" | "english" => Ok(Self::English),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Plain and markdown renditions of the same passage in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePair {
    pub plain: String,
    pub markdown: String,
}

impl SourcePair {
    pub fn new(plain: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            markdown: markdown.into(),
        }
    }

    /// Same text used as both plain and markdown.
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            markdown: text.clone(),
            plain: text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.plain.trim().is_empty() && self.markdown.trim().is_empty()
    }

    /// Both texts joined by a newline; grounding is checked against this.
    pub fn joined(&self) -> String {
        format!("{}\n{}", self.plain, self.markdown)
    }
}

/// One review unit: the English source and its Korean translation.
///
/// English findings land in `content_report`, Korean findings in
/// `translated_report`. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub english: SourcePair,
    pub korean: SourcePair,
}

impl ReviewRequest {
    /// Review a single text in one language; the other side stays empty.
    pub fn single(text: impl Into<String>, language: Language) -> Self {
        let pair = SourcePair::same(text);
        match language {
            Language::English => Self {
                english: pair,
                korean: SourcePair::default(),
            },
            Language::Korean => Self {
                english: SourcePair::default(),
                korean: pair,
            },
        }
    }

    /// All four texts joined; markdown-mismatch findings are grounded against this.
    pub fn all_text(&self) -> String {
        format!("{}\n{}", self.english.joined(), self.korean.joined())
    }
}

/// Final per-request output handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub score: u8,
    pub content_report: String,
    pub translated_report: String,
    pub markdown_report: String,
}

impl Default for ReviewResult {
    fn default() -> Self {
        Self {
            score: MIN_SCORE,
            content_report: String::new(),
            translated_report: String::new(),
            markdown_report: String::new(),
        }
    }
}

impl ReviewResult {
    /// High-suspicion result carrying an explanation instead of findings.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            score: MAX_SCORE,
            content_report: message.into(),
            translated_report: String::new(),
            markdown_report: String::new(),
        }
    }

    /// True when no bucket carries any text.
    pub fn is_clean(&self) -> bool {
        self.content_report.trim().is_empty()
            && self.translated_report.trim().is_empty()
            && self.markdown_report.trim().is_empty()
    }

    /// Clamp the score into range and tie it to whether findings survived.
    ///
    /// No findings → 1. Findings with a score of 1 → 3.
    pub fn with_consistent_score(mut self) -> Self {
        self.score = self.score.clamp(MIN_SCORE, MAX_SCORE);
        if self.is_clean() {
            self.score = MIN_SCORE;
        } else if self.score == MIN_SCORE {
            self.score = FLAGGED_FLOOR;
        }
        self
    }
}

/// One report before and after sanitization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTrace {
    pub before: String,
    pub after: String,
}

/// Everything needed to see what the sanitizer did to a reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugBundle {
    /// Reply exactly as decoded from the model.
    pub raw: serde_json::Value,
    pub english: ReportTrace,
    pub korean: ReportTrace,
    pub markdown: ReportTrace,
}
