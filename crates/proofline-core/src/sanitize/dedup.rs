//! Duplicate and overlap collapsing within one report bucket.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::finding::parse_finding;
use crate::text::{join_lines, report_lines};

static UNNECESSARY_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"불필요한\s*(?:마침표|문장\s?부호|종결\s?부호)|(?:마침표|문장\s?부호|종결\s?부호).{0,8}?(?:불필요|삭제)|(?i:\b(?:unnecessary|extra|redundant)\s+(?:period|full stop|punctuation)\b)",
    )
    .expect("valid unnecessary-punctuation regex")
});

/// Whether an explanation reports an unnecessary terminal punctuation mark.
pub fn is_unnecessary_punctuation(explanation: &str) -> bool {
    UNNECESSARY_PUNCT_RE.is_match(explanation)
}

/// Drop repeated lines, then subsume overlapping unnecessary-punctuation findings.
///
/// Among unnecessary-punctuation findings, one whose original is a proper
/// substring of another's original is dropped in favour of the longer quote.
/// Other findings are never subsumed. Running this twice changes nothing.
pub fn dedupe(report: &str) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = report_lines(report).filter(|l| seen.insert(*l)).collect();

    let punct_originals: Vec<Option<&str>> = unique
        .iter()
        .map(|line| {
            parse_finding(line)
                .filter(|f| is_unnecessary_punctuation(f.explanation))
                .map(|f| f.original.trim())
                .filter(|o| !o.is_empty())
        })
        .collect();

    let kept: Vec<&str> = unique
        .iter()
        .zip(&punct_originals)
        .filter(|(_, original)| match **original {
            Some(short) => !punct_originals
                .iter()
                .flatten()
                .any(|long| long.len() > short.len() && long.contains(short)),
            None => true,
        })
        .map(|(line, _)| *line)
        .collect();

    join_lines(&kept)
}
