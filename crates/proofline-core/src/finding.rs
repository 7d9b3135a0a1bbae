//! Parsing of finding lines in a model report.
//!
//! The canonical form is `- '<original>' → '<replacement>': <explanation>`.
//! The model is loose about bullets, quote styles and arrows, so those vary:
//!
//! - bullet: `-`, `*`, `•` or none
//! - quotes: straight or curly, single or double
//! - arrow: `→`, `->`, `=>`, `⇒`
//! - explanation: optional, after `:` or whitespace
//!
//! Lines that do not fit are free-form advisories.

use std::sync::LazyLock;

use regex::Regex;

static FINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:[-*•]\s*)?['"‘“](?P<original>.*?)['"’”]\s*(?:→|->|=>|⇒)\s*['"‘“](?P<replacement>.*?)['"’”](?:\s*[:：]|\s+|$)\s*(?P<explanation>.*)$"#,
    )
    .expect("valid finding regex")
});

/// A structured finding borrowed from one report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding<'a> {
    pub original: &'a str,
    pub replacement: &'a str,
    pub explanation: &'a str,
}

/// Parse a report line as a finding. `None` for free-form lines.
pub fn parse_finding(line: &str) -> Option<Finding<'_>> {
    let caps = FINDING_RE.captures(line)?;
    Some(Finding {
        original: caps.name("original")?.as_str(),
        replacement: caps.name("replacement")?.as_str(),
        explanation: caps.name("explanation").map_or("", |m| m.as_str().trim()),
    })
}
