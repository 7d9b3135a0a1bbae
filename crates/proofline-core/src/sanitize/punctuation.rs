//! Terminal punctuation rules, checked against the source instead of trusting the model.
//!
//! Terminal punctuation is `.`, `?` or `!`, optionally followed by one closing
//! quote or bracket. Two independent rules:
//!
//! - suppression: the source already ends with terminal punctuation, so any
//!   "missing period" claim is a false positive and is dropped;
//! - injection: the source really lacks it, so an advisory is appended,
//!   once for the paragraph ending and once for sentences inside it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::finding::parse_finding;
use crate::review::Language;
use crate::text::{has_letter, join_lines, report_lines, trim_invisible};

const TERMINALS: &[char] = &['.', '?', '!'];

const CLOSERS: &[char] = &[
    '"', '\'', '”', '’', ')', ']', '}', '」', '』', '》', '〉',
];

/// Phrases identifying a paragraph-ending advisory already in the report.
pub const PARAGRAPH_MARKERS: &[&str] = &["문단 마지막 문장", "last sentence of the paragraph"];

/// Phrases identifying a sentence-level advisory already in the report.
pub const SENTENCE_MARKERS: &[&str] = &["문단 중간의 일부 문장", "sentences inside the paragraph"];

static MISSING_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:마침표|문장\s?부호|종결\s?부호|구두점).{0,12}?(?:누락|없|빠)|누락된\s*(?:마침표|문장\s?부호|종결\s?부호)|(?i:\bmissing\b.{0,30}?\b(?:period|full stop|punctuation)\b|\b(?:period|full stop|punctuation)\b.{0,20}?\b(?:missing|absent)\b)",
    )
    .expect("valid missing-punctuation regex")
});

// Spacing and surplus-mark complaints mention a period without claiming one is absent.
static NOT_MISSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"띄어|띄워|공백|빈칸|없애|삭제|중복|(?i:\bspac(?:e|es|ing)\b|\bremove\b|\bduplicate)")
        .expect("valid spacing regex")
});

fn paragraph_advisory(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "- 문단 마지막 문장에 마침표(.)·물음표(?)·느낌표(!) 등 문장 종결 부호가 없습니다."
        }
        Language::English => {
            "- The last sentence of the paragraph has no terminal punctuation (., ?, !)."
        }
    }
}

fn sentence_advisory(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "- 문단 중간의 일부 문장 끝에 마침표(.)·물음표(?)·느낌표(!) 등 문장 종결 부호가 없습니다."
        }
        Language::English => {
            "- Some sentences inside the paragraph have no terminal punctuation (., ?, !)."
        }
    }
}

/// Whether `text` ends with terminal punctuation, ignoring trailing whitespace.
pub fn ends_with_terminal(text: &str) -> bool {
    let mut rev = trim_invisible(text).chars().rev();
    match rev.next() {
        Some(c) if TERMINALS.contains(&c) => true,
        Some(c) if CLOSERS.contains(&c) => rev.next().is_some_and(|p| TERMINALS.contains(&p)),
        _ => false,
    }
}

/// Whether a report line claims terminal punctuation is missing.
///
/// For finding lines only the explanation is read, so quoted fragments that
/// happen to contain "missing" or "마침표" do not count. Complaints about
/// spacing around a period or a surplus period are not missing claims.
pub fn claims_missing(line: &str) -> bool {
    let text = parse_finding(line).map_or(line, |f| f.explanation);
    MISSING_CLAIM_RE.is_match(text) && !NOT_MISSING_RE.is_match(text)
}

fn is_advisory(line: &str) -> bool {
    contains_any(line, PARAGRAPH_MARKERS) || contains_any(line, SENTENCE_MARKERS)
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Drop "missing terminal punctuation" claims when the source ends correctly.
pub fn suppress_false_missing(report: &str, source: &str) -> String {
    if source.trim().is_empty() || !ends_with_terminal(source) {
        return join_lines(&report_lines(report).collect::<Vec<_>>());
    }
    let kept: Vec<&str> = report_lines(report)
        .filter(|line| {
            let false_claim = claims_missing(line) && !is_advisory(line);
            if false_claim {
                debug!(line, "false missing-punctuation claim dropped");
            }
            !false_claim
        })
        .collect();
    join_lines(&kept)
}

/// Split text into sentences: by line, then after terminal punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for line in text.lines() {
        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let mut start = 0;
        let mut i = 0;
        while i < chars.len() {
            if !TERMINALS.contains(&chars[i].1) {
                i += 1;
                continue;
            }
            let mut end = i + 1;
            while end < chars.len() && TERMINALS.contains(&chars[end].1) {
                end += 1;
            }
            if end < chars.len() && CLOSERS.contains(&chars[end].1) {
                end += 1;
            }
            if end < chars.len() && chars[end].1.is_whitespace() {
                let cut = chars[end].0;
                out.push(line[start..cut].trim());
                start = cut;
            }
            i = end;
        }
        out.push(line[start..].trim());
    }
    out.retain(|s| !s.is_empty());
    out
}

/// Append advisories for terminal punctuation the source really lacks.
///
/// Fragments without letters (list numbers, separators) are ignored. Each
/// advisory is added at most once, so repeated calls are stable.
pub fn inject_missing(report: &str, source: &str, language: Language) -> String {
    let mut lines: Vec<&str> = report_lines(report).collect();
    if source.trim().is_empty() {
        return join_lines(&lines);
    }

    let sentences: Vec<&str> = split_sentences(source)
        .into_iter()
        .filter(|s| has_letter(s))
        .collect();
    let Some((last, rest)) = sentences.split_last() else {
        return join_lines(&lines);
    };

    if !ends_with_terminal(last) && !contains_any(report, PARAGRAPH_MARKERS) {
        debug!(%language, "paragraph ending lacks terminal punctuation");
        lines.push(paragraph_advisory(language));
    }

    if rest.iter().any(|s| !ends_with_terminal(s)) && !contains_any(report, SENTENCE_MARKERS) {
        debug!(%language, "inner sentence lacks terminal punctuation");
        lines.push(sentence_advisory(language));
    }

    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_detection() {
        assert!(ends_with_terminal("끝."));
        assert!(ends_with_terminal("정말?  \n"));
        assert!(ends_with_terminal("\"나는 말한다.\""));
        assert!(ends_with_terminal("(see above.)"));
        assert!(!ends_with_terminal("이것은 문장"));
        assert!(!ends_with_terminal("\"quoted\""));
        assert!(!ends_with_terminal(""));
    }

    #[test]
    fn missing_claims_recognized() {
        assert!(claims_missing("- '끝' → '끝.': 마침표 누락"));
        assert!(claims_missing("- 문장 끝에 마침표가 없음."));
        assert!(claims_missing("- 누락된 문장부호가 있습니다."));
        assert!(claims_missing("- 'done' → 'done.': missing period"));
        assert!(claims_missing("- The final punctuation is missing."));
        assert!(!claims_missing("- '사과을' → '사과를': 조사 오류"));
        assert!(!claims_missing("- '끝..' → '끝.': 불필요한 마침표"));
    }

    #[test]
    fn false_claim_suppressed_when_source_ends_correctly() {
        let report = "- '끝.' → '끝.': 마침표 누락";
        assert_eq!(suppress_false_missing(report, "끝."), "");
    }

    #[test]
    fn false_claim_suppressed_behind_closing_quote() {
        let report = "- 문장 끝에 마침표가 없습니다.\n- '사과을' → '사과를': 조사";
        assert_eq!(
            suppress_false_missing(report, "그는 \"사과을 먹었다.\"  "),
            "- '사과을' → '사과를': 조사"
        );
    }

    #[test]
    fn quoted_fragments_are_not_claims() {
        assert!(!claims_missing("- 'missing period' → 'missing periods': 복수형"));
        assert!(!claims_missing("- '마침표 없이' → '마침표 없이도': 조사"));
    }

    #[test]
    fn spacing_and_surplus_complaints_survive_suppression() {
        let ko = "- '갔다.그리고' → '갔다. 그리고': 마침표 뒤 띄어쓰기 누락";
        assert!(!claims_missing(ko));
        assert_eq!(suppress_false_missing(ko, "그는 학교에 갔다.그리고 집에 왔다."), ko);

        let en = "- 'end.The' → 'end. The': missing space after period";
        assert!(!claims_missing(en));
        assert_eq!(suppress_false_missing(en, "It was the end.The next day came."), en);

        let dup = "- '갔다..' → '갔다.': 마침표가 중복되어 하나를 없애야 함";
        assert!(!claims_missing(dup));
        assert_eq!(suppress_false_missing(dup, "그는 학교에 갔다.."), dup);
    }

    #[test]
    fn real_claim_kept_when_source_lacks_punctuation() {
        let report = "- '갔다' → '갔다.': 마침표 누락";
        assert_eq!(suppress_false_missing(report, "학교에 갔다"), report);
    }

    #[test]
    fn sentence_split() {
        assert_eq!(
            split_sentences("첫 문장. 둘째 문장? 셋째!\n넷째 줄"),
            vec!["첫 문장.", "둘째 문장?", "셋째!", "넷째 줄"]
        );
        assert_eq!(
            split_sentences("He said \"hi.\" Then left"),
            vec!["He said \"hi.\"", "Then left"]
        );
        assert_eq!(split_sentences("3.14 is pi."), vec!["3.14 is pi."]);
    }

    #[test]
    fn paragraph_advisory_injected_once() {
        let once = inject_missing("", "이것은 문장", Language::Korean);
        assert_eq!(once, paragraph_advisory(Language::Korean));
        let twice = inject_missing(&once, "이것은 문장", Language::Korean);
        assert_eq!(twice, once);
    }

    #[test]
    fn nothing_injected_for_terminated_paragraph() {
        assert_eq!(inject_missing("", "첫 문장. 둘째 문장.", Language::Korean), "");
    }

    #[test]
    fn sentence_advisory_for_inner_line() {
        let out = inject_missing("", "Heading line\nBody sentence.", Language::English);
        assert_eq!(out, sentence_advisory(Language::English));
    }

    #[test]
    fn both_advisories_can_fire() {
        let out = inject_missing("- 'teh' → 'the': typo", "First line\nsecond line", Language::English);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- 'teh' → 'the': typo");
        assert_eq!(lines[1], paragraph_advisory(Language::English));
        assert_eq!(lines[2], sentence_advisory(Language::English));
    }

    #[test]
    fn malformed_fragments_ignored() {
        assert_eq!(inject_missing("", "1)\n본문 문장.", Language::Korean), "");
    }

    #[test]
    fn blank_source_injects_nothing() {
        assert_eq!(inject_missing("", "   \n ", Language::Korean), "");
        assert_eq!(inject_missing("- x", "", Language::English), "- x");
    }

    #[test]
    fn advisory_survives_suppression() {
        let report = inject_missing("", "Heading line\nBody sentence.", Language::English);
        assert_eq!(suppress_false_missing(&report, "Heading line\nBody sentence."), report);
    }
}
