//! The response sanitization pipeline.
//!
//! ```text
//! reply → normalize → policy → grounding → punctuation → dedup → split → ReviewResult
//! ```
//!
//! Every stage is a total function over strings. Grounding runs before
//! punctuation injection so that injected advisories are never re-grounded.

pub mod dedup;
pub mod grounding;
pub mod normalize;
pub mod policy;
pub mod punctuation;
pub mod split;

use serde_json::Value;
use tracing::debug;

use crate::review::{DebugBundle, Language, ReportTrace, ReviewRequest, ReviewResult, SourcePair};
use crate::text::{join_lines, report_lines};

pub use normalize::{Normalized, NormalizedReply, decode_reply, normalize, upstream_error};
pub use split::Split;

/// Sanitized result plus the trace of what was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub result: ReviewResult,
    pub debug: DebugBundle,
}

/// Run the whole pipeline for one request and its decoded model reply.
pub fn sanitize(request: &ReviewRequest, reply: &Value) -> Sanitized {
    let normalized = match normalize(reply) {
        Normalized::Reports(r) => r,
        Normalized::Degraded(result) => {
            debug!(score = result.score, "reply degraded");
            let debug = DebugBundle {
                raw: reply.clone(),
                english: ReportTrace {
                    before: String::new(),
                    after: result.content_report.clone(),
                },
                ..Default::default()
            };
            return Sanitized { result, debug };
        }
    };

    let content = policy::apply(&normalized.content);
    let translated = policy::apply(&normalized.translated);
    let markdown = policy::apply(&normalized.markdown);

    let english = clean_bucket(&content, &request.english, Language::English);
    let korean = clean_bucket(&translated, &request.korean, Language::Korean);

    let markdown = grounding::filter(&markdown, &request.all_text());
    let markdown = dedup::dedupe(&join_lines(
        &report_lines(&markdown)
            .chain(report_lines(&english.markdown))
            .chain(report_lines(&korean.markdown))
            .collect::<Vec<_>>(),
    ));

    let result = ReviewResult {
        score: normalized.score,
        content_report: english.plain,
        translated_report: korean.plain,
        markdown_report: markdown,
    }
    .with_consistent_score();

    debug!(
        score = result.score,
        content_lines = report_lines(&result.content_report).count(),
        translated_lines = report_lines(&result.translated_report).count(),
        markdown_lines = report_lines(&result.markdown_report).count(),
        "reply sanitized"
    );

    let debug = DebugBundle {
        raw: reply.clone(),
        english: ReportTrace {
            before: normalized.content,
            after: result.content_report.clone(),
        },
        korean: ReportTrace {
            before: normalized.translated,
            after: result.translated_report.clone(),
        },
        markdown: ReportTrace {
            before: normalized.markdown,
            after: result.markdown_report.clone(),
        },
    };

    Sanitized { result, debug }
}

/// Grounding, punctuation rules, dedup and source split for one language bucket.
fn clean_bucket(report: &str, pair: &SourcePair, language: Language) -> Split {
    let report = grounding::filter(report, &pair.joined());
    let report = punctuation::suppress_false_missing(&report, &pair.plain);
    let report = punctuation::inject_missing(&report, &pair.plain, language);
    let report = dedup::dedupe(&report);
    split::split_by_source(&report, &pair.plain, &pair.markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn degraded_reply_short_circuits() {
        let request = ReviewRequest::single("이것은 문장", Language::Korean);
        let out = sanitize(&request, &json!("not an object"));
        assert_eq!(out.result.score, 5);
        assert_eq!(out.result.content_report, normalize::INVALID_REPLY_MESSAGE);
        assert!(out.result.translated_report.is_empty());
    }

    #[test]
    fn clean_reply_for_clean_text_scores_one() {
        let request = ReviewRequest::single("그는 학교에 갔다.", Language::Korean);
        let out = sanitize(
            &request,
            &json!({ "suspicionScore": 4, "translatedTypoReport": "오류 없음" }),
        );
        assert!(out.result.is_clean());
        assert_eq!(out.result.score, 1);
        assert_eq!(out.debug.korean.before, "오류 없음");
        assert_eq!(out.debug.korean.after, "");
    }

    #[test]
    fn markdown_only_english_finding_moves_to_markdown_bucket() {
        let request = ReviewRequest {
            english: SourcePair::new("He went to school.", "He went to scool."),
            korean: SourcePair::default(),
        };
        let out = sanitize(
            &request,
            &json!({
                "suspicionScore": 2,
                "contentTypoReport": "- 'scool' → 'school': spelling"
            }),
        );
        assert_eq!(out.result.content_report, "");
        assert_eq!(out.result.markdown_report, "- 'scool' → 'school': spelling");
        assert_eq!(out.result.score, 2);
    }

    #[test]
    fn markdown_field_grounded_against_all_texts() {
        let request = ReviewRequest {
            english: SourcePair::new("He went to school.", "He went school."),
            korean: SourcePair::new("그는 학교에 갔다.", "그는 학교 갔다."),
        };
        let out = sanitize(
            &request,
            &json!({
                "suspicionScore": 3,
                "markdownReport": "- 'went school' → 'went to school': missing word\n- '없는 문장' → '없는 문장들': 환각"
            }),
        );
        assert_eq!(
            out.result.markdown_report,
            "- 'went school' → 'went to school': missing word"
        );
    }

    #[test]
    fn foreign_bucket_without_source_loses_findings() {
        let request = ReviewRequest::single("그는 학교에 갔다.", Language::Korean);
        let out = sanitize(
            &request,
            &json!({
                "suspicionScore": 3,
                "contentTypoReport": "- 'teh' → 'the': typo"
            }),
        );
        assert!(out.result.is_clean());
        assert_eq!(out.result.score, 1);
    }
}
