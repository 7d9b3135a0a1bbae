//! Validating decoder for the model reply.
//!
//! The reply is untrusted: it may not be JSON, may not be an object, may miss
//! fields or carry the wrong types, or may wrap an upstream error. Every shape
//! maps to either a four-field [`NormalizedReply`] or a degraded
//! [`ReviewResult`]; nothing here fails.

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::review::{MAX_SCORE, MIN_SCORE, ReviewResult};

/// Shown in `content_report` when the reply is not a JSON object.
pub const INVALID_REPLY_MESSAGE: &str = "model reply was not valid structured data";

const SCORE_KEYS: &[&str] = &["suspicionScore", "suspicion_score"];
const CONTENT_KEYS: &[&str] = &["contentTypoReport", "content_typo_report"];
const TRANSLATED_KEYS: &[&str] = &["translatedTypoReport", "translated_typo_report"];
const MARKDOWN_KEYS: &[&str] = &["markdownReport", "markdown_report"];

/// The four expected reply fields, coerced to their nominal types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub score: u8,
    pub content: String,
    pub translated: String,
    pub markdown: String,
}

/// Outcome of normalizing a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Reports(NormalizedReply),
    /// Not usable as a review; skips the remaining stages.
    Degraded(ReviewResult),
}

/// Decode reply text into a JSON value, tolerating fences and surrounding chatter.
///
/// Text with no recoverable JSON becomes a JSON string, which [`normalize`]
/// then treats as a non-object reply.
pub fn decode_reply(text: &str) -> Value {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return value;
    }

    // ```json ... ``` fence.
    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```")
            && let Ok(value) = serde_json::from_str::<Value>(body[..end].trim())
        {
            return value;
        }
    }

    // Outermost braces.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
        && let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end])
    {
        return value;
    }

    warn!(len = trimmed.len(), "model reply is not JSON");
    Value::String(trimmed.to_string())
}

/// Reply value standing in for a generator call that never succeeded.
pub fn upstream_error(message: impl Into<String>) -> Value {
    json!({ "error": { "message": message.into() } })
}

/// Coerce a decoded reply into the fixed four-field shape.
pub fn normalize(reply: &Value) -> Normalized {
    let Some(map) = reply.as_object() else {
        return Normalized::Degraded(ReviewResult::degraded(INVALID_REPLY_MESSAGE));
    };

    if let Some(message) = upstream_error_message(map) {
        return Normalized::Degraded(ReviewResult::degraded(message));
    }

    Normalized::Reports(NormalizedReply {
        score: coerce_score(field(map, SCORE_KEYS)),
        content: string_field(map, CONTENT_KEYS),
        translated: string_field(map, TRANSLATED_KEYS),
        markdown: string_field(map, MARKDOWN_KEYS),
    })
}

fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn string_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    field(map, keys)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn upstream_error_message(map: &Map<String, Value>) -> Option<String> {
    match map.get("error")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .unwrap_or("upstream model error")
                .to_string(),
        ),
        _ => None,
    }
}

/// Integer in `[1, 5]`; anything unparseable becomes 1.
fn coerce_score(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            })
        }
        _ => None,
    };
    match raw {
        Some(n) => n.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8,
        None => MIN_SCORE,
    }
}
