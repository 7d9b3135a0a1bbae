//! Hallucination defense: every quoted original must exist in the source.

use tracing::debug;

use crate::finding::parse_finding;
use crate::text::{contains_fragment, join_lines, report_lines};

/// Keep finding lines whose original is in `source`; free-form lines pass.
pub fn filter(report: &str, source: &str) -> String {
    let kept: Vec<&str> = report_lines(report)
        .filter(|line| {
            let grounded = is_grounded(line, source);
            if !grounded {
                debug!(line, "ungrounded finding dropped");
            }
            grounded
        })
        .collect();
    join_lines(&kept)
}

/// Whether a single report line is grounded in `source`.
pub fn is_grounded(line: &str, source: &str) -> bool {
    match parse_finding(line) {
        Some(finding) => contains_fragment(source, finding.original),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_finding_kept() {
        let line = "- '그는는' → '그는': 조사 중복.";
        assert_eq!(filter(line, "그는는 학교에 갔다"), line);
    }

    #[test]
    fn hallucinated_finding_dropped() {
        let report = "- '사과을' → '사과를': 조사\n- '그는는' → '그는': 중복";
        assert_eq!(
            filter(report, "그는는 학교에 갔다"),
            "- '그는는' → '그는': 중복"
        );
    }

    #[test]
    fn whitespace_normalized_match_kept() {
        let line = "- '학교에갔다' → '학교에 갔다': 띄어쓰기";
        assert_eq!(filter(line, "그는 학교에 갔\u{200B}다"), line);
    }

    #[test]
    fn free_form_line_passes() {
        let line = "- 문단 전체에 따옴표 짝이 맞지 않습니다.";
        assert_eq!(filter(line, "아무 텍스트"), line);
    }

    #[test]
    fn empty_source_grounds_nothing() {
        assert_eq!(filter("- 'a' → 'b': x", ""), "");
    }

    #[test]
    fn empty_original_is_not_grounded() {
        assert_eq!(filter("- '' → '를': 조사 누락", "그는 사과 먹었다."), "");
    }
}
