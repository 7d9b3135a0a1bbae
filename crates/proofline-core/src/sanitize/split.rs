//! Routing of findings to the plain or markdown bucket by where their quote occurs.

use crate::finding::parse_finding;
use crate::text::{contains_fragment, join_lines, report_lines};

/// A bucket split into plain-text and markdown-text findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    pub plain: String,
    pub markdown: String,
}

/// Route each line by which source contains its original.
///
/// Only in `markdown` → markdown bucket. Everything else (only in `plain`,
/// in both, in neither, free-form) → plain bucket.
pub fn split_by_source(report: &str, plain: &str, markdown: &str) -> Split {
    let mut plain_lines = Vec::new();
    let mut markdown_lines = Vec::new();

    for line in report_lines(report) {
        let markdown_only = parse_finding(line).is_some_and(|f| {
            contains_fragment(markdown, f.original) && !contains_fragment(plain, f.original)
        });
        if markdown_only {
            markdown_lines.push(line);
        } else {
            plain_lines.push(line);
        }
    }

    Split {
        plain: join_lines(&plain_lines),
        markdown: join_lines(&markdown_lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_only_fragment_routed_to_markdown() {
        let split = split_by_source("- 'C' → 'D': typo", "A B", "A B C");
        assert_eq!(split.plain, "");
        assert_eq!(split.markdown, "- 'C' → 'D': typo");
    }

    #[test]
    fn shared_fragment_stays_plain() {
        let split = split_by_source("- 'A' → 'E': typo", "A B", "A B C");
        assert_eq!(split.plain, "- 'A' → 'E': typo");
        assert_eq!(split.markdown, "");
    }

    #[test]
    fn unknown_fragment_and_free_form_stay_plain() {
        let report = "- 'Z' → 'Y': typo\n- free-form advisory";
        let split = split_by_source(report, "A B", "A B C");
        assert_eq!(split.plain, report);
        assert!(split.markdown.is_empty());
    }

    #[test]
    fn mixed_report_is_partitioned_in_order() {
        let report = "- 'B' → 'b': x\n- '**C**' → 'C': y\n- 'A' → 'a': z";
        let split = split_by_source(report, "A B", "A B **C**");
        assert_eq!(split.plain, "- 'B' → 'b': x\n- 'A' → 'a': z");
        assert_eq!(split.markdown, "- '**C**' → 'C': y");
    }
}
