//! Content policy: only objective point fixes may survive.
//!
//! Two whole-field purges (stylistic judgment, "no issues" filler) and three
//! per-line purges (self-identical, cross-language, oversized edits).

use tracing::debug;

use crate::finding::{Finding, parse_finding};
use crate::text::{Scripts, compact, join_lines, report_lines};

/// Markers of stylistic or subjective judgment. Any hit blanks the whole field.
pub const STYLE_MARKERS: &[&str] = &[
    "문맥상",
    "부적절",
    "어색",
    "더 자연스럽",
    "더 적절",
    "수정하는 것이 좋",
    "제안",
    "바꾸는 것",
    "의미를 명확히",
];

/// English style markers, matched case-insensitively.
pub const STYLE_MARKERS_EN: &[&str] = &[
    "more natural",
    "more appropriate",
    "unnatural",
    "awkward",
    "suggest changing",
    "consider changing",
    "contextually",
];

/// Boilerplate meaning "nothing wrong". Any hit blanks the whole field.
pub const FILLER_PHRASES: &[&str] = &["오류 없음", "정상", "문제 없음", "수정할 필요 없음"];

/// English filler, matched case-insensitively.
pub const FILLER_PHRASES_EN: &[&str] = &["no errors", "no issues", "looks fine", "no problems"];

/// Length change (whitespace excluded) at which an edit stops being a point fix.
pub const MAX_EDIT_DELTA: usize = 3;

/// Why a finding line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineViolation {
    SelfIdentical,
    CrossLanguage,
    OversizedEdit,
}

impl LineViolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfIdentical => "self_identical",
            Self::CrossLanguage => "cross_language",
            Self::OversizedEdit => "oversized_edit",
        }
    }
}

/// Apply every policy rule to one report field.
pub fn apply(report: &str) -> String {
    let report = purge_subjective(report);
    let report = purge_filler(&report);
    purge_lines(&report)
}

/// Blank the field if it contains any stylistic-judgment marker.
pub fn purge_subjective(report: &str) -> String {
    if contains_marker(report, STYLE_MARKERS, STYLE_MARKERS_EN) {
        debug!("report blanked: stylistic judgment");
        return String::new();
    }
    report.to_string()
}

/// Blank the field if it contains "no issues" boilerplate.
pub fn purge_filler(report: &str) -> String {
    if contains_marker(report, FILLER_PHRASES, FILLER_PHRASES_EN) {
        debug!("report blanked: no-issue filler");
        return String::new();
    }
    report.to_string()
}

/// Drop finding lines that break a per-line rule. Free-form lines are kept.
pub fn purge_lines(report: &str) -> String {
    let kept: Vec<&str> = report_lines(report)
        .filter(|line| match parse_finding(line).and_then(|f| line_violation(&f)) {
            Some(violation) => {
                debug!(rule = violation.as_str(), line, "finding dropped");
                false
            }
            None => true,
        })
        .collect();
    join_lines(&kept)
}

/// First per-line rule a finding breaks, if any.
pub fn line_violation(finding: &Finding<'_>) -> Option<LineViolation> {
    let original = finding.original.trim();
    let replacement = finding.replacement.trim();

    if original == replacement {
        return Some(LineViolation::SelfIdentical);
    }

    let from = Scripts::of(original);
    let to = Scripts::of(replacement);
    if !from.is_empty() && !to.is_empty() && !from.overlaps(&to) {
        return Some(LineViolation::CrossLanguage);
    }

    let from_len = compact(original).chars().count();
    let to_len = compact(replacement).chars().count();
    if from_len.abs_diff(to_len) >= MAX_EDIT_DELTA {
        return Some(LineViolation::OversizedEdit);
    }

    None
}

fn contains_marker(report: &str, markers: &[&str], markers_en: &[&str]) -> bool {
    if markers.iter().any(|m| report.contains(m)) {
        return true;
    }
    let lower = report.to_lowercase();
    markers_en.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_marker_blanks_whole_field() {
        let report = "- '사과을' → '사과를': 조사 오류\n- '아울러'는 문맥상 부적절합니다.";
        assert_eq!(apply(report), "");
    }

    #[test]
    fn english_style_marker_is_case_insensitive() {
        assert_eq!(apply("- 'big' → 'large': More Natural wording"), "");
    }

    #[test]
    fn filler_blanks_whole_field() {
        assert_eq!(apply("오류 없음"), "");
        assert_eq!(apply("No issues found."), "");
    }

    #[test]
    fn self_identical_correction_dropped() {
        let report = "- '학교' → ' 학교 ': 띄어쓰기\n- '사과을' → '사과를': 조사";
        assert_eq!(apply(report), "- '사과을' → '사과를': 조사");
    }

    #[test]
    fn cross_language_correction_dropped() {
        assert_eq!(apply("- '사과' → 'apple': 번역"), "");
        assert_eq!(apply("- 'apple' → '사과': 번역"), "");
    }

    #[test]
    fn same_script_correction_kept() {
        let line = "- '사과' → '사과를': 조사 누락";
        assert_eq!(apply(line), line);
    }

    #[test]
    fn mixed_script_overlap_kept() {
        let line = "- 'Al모델' → 'AI모델': 오타";
        assert_eq!(apply(line), line);
    }

    #[test]
    fn oversized_edit_dropped() {
        // 3 characters longer once spaces are removed.
        assert_eq!(apply("- '학교' → '학교에 갔다': 누락"), "");
    }

    #[test]
    fn small_edit_kept() {
        let line = "- '이점들을를' → '이점들을': 중복 조사";
        assert_eq!(apply(line), line);
        // Spacing-only fix: same length once whitespace is removed.
        let spacing = "- '책을읽고' → '책을 읽고': 띄어쓰기";
        assert_eq!(apply(spacing), spacing);
    }

    #[test]
    fn free_form_lines_pass_line_rules() {
        let line = "- 따옴표가 한쪽만 있음.";
        assert_eq!(apply(line), line);
    }

    #[test]
    fn violation_kinds() {
        let f = parse_finding("- 'a' → 'a': x").unwrap();
        assert_eq!(line_violation(&f), Some(LineViolation::SelfIdentical));
        let f = parse_finding("- '사과' → 'apple': x").unwrap();
        assert_eq!(line_violation(&f), Some(LineViolation::CrossLanguage));
        let f = parse_finding("- 'teh' → 'the': x").unwrap();
        assert_eq!(line_violation(&f), None);
    }
}
