//! Review prompt construction.
//!
//! The prompt only has to make the model answer with the four JSON keys and
//! the `- 'original' → 'replacement': explanation` line form. Everything it
//! forbids is enforced again by the sanitizer, so wording changes here never
//! affect correctness.

use proofline_core::ReviewRequest;

const INSTRUCTIONS: &str = r#"You are a machine-like data verifier. Your ONLY job is to find objective, factual errors in the English source text and the Korean translated text.
You are strictly forbidden from judging style or meaning, or making subjective suggestions.
Your output MUST be a single valid JSON object with exactly these keys:
- "suspicion_score": integer 1-5 (1 = almost certainly no error, 5 = very likely serious errors)
- "content_typo_report": string, errors in the English text (may be "")
- "translated_typo_report": string, errors in the Korean text (may be "")
- "markdown_report": string, plain vs markdown mismatches in either language (may be "")

Write one finding per line, exactly in this form:
- '<original text quoted from the input>' → '<corrected text>': <short reason>

## Objective errors you may report

English:
1. Spelling typos of common words ("recieve" → "receive", "teh" → "the"). Proper nouns, product names, code tokens and formulas are not typos.
2. Accidental spaces inside a word or duplicated words ("re turn" → "return", "the the" → "the").
3. "Al" written for "AI" in an artificial-intelligence context ("Al model" → "AI model").
4. A word missing, added or different between plain_english and markdown_english.

Korean:
1. 오탈자: 잘못된 철자, 중복 글자 ("이점들을를" → "이점들을").
2. 조사/어미 오류 ("사과을" → "사과를").
3. 명백한 띄어쓰기 오류 ("책을읽고" → "책을 읽고").
4. 필수 문장부호 누락, 짝이 맞지 않는 따옴표.
5. 형태소 분리 오류 ("된 다" → "된다"). 두 형태가 모두 허용되는 띄어쓰기는 제외.
6. 반복 오타 ("된다따따." → "된다.").
7. plain_korean과 markdown_korean 사이에 빠지거나 추가되거나 다른 단어.

## Rules
1. NO stylistic feedback. Never suggest alternative wording or say something is "more natural" or "more appropriate".
2. If a field has no objective error its value MUST be "". Never write "오류 없음", "정상", "문제 없음" or "no issues".
3. Italicized English rendered as 'single quotes' or 《double angle brackets》 in Korean is correct.
4. The quoted original MUST be copied verbatim from the data below.
5. The correction MUST differ from the original.
"#;

/// Build the review prompt for one request.
pub fn review_prompt(request: &ReviewRequest) -> String {
    format!(
        "{INSTRUCTIONS}\n## Data to review\n- plain_english: {}\n- markdown_english: {}\n- plain_korean: {}\n- markdown_korean: {}\n",
        quote(&request.english.plain),
        quote(&request.english.markdown),
        quote(&request.korean.plain),
        quote(&request.korean.markdown),
    )
}

/// JSON string literal, so embedded quotes and newlines cannot break the data block.
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
