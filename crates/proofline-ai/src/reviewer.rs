//! Prompt → generate (with retry) → decode → sanitize.

use proofline_core::sanitize::{decode_reply, upstream_error};
use proofline_core::{DebugBundle, Language, ReviewRequest, ReviewResult, Row, Sanitized, sanitize};
use tracing::{info, instrument, warn};

use crate::generator::Generator;
use crate::prompt::review_prompt;
use crate::retry::RetryPolicy;

/// Reviews passages with a [`Generator`] and sanitizes every reply.
///
/// Never fails: exhausted retries and malformed replies come back as
/// score-5 results explaining what went wrong.
pub struct Reviewer<G> {
    generator: G,
    retry: RetryPolicy,
}

impl<G: Generator> Reviewer<G> {
    pub fn new(generator: G, retry: RetryPolicy) -> Self {
        Self { generator, retry }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Review one request and keep the before/after trace.
    #[instrument(skip_all)]
    pub async fn review_request(&self, request: &ReviewRequest) -> Sanitized {
        let prompt = review_prompt(request);
        let reply = match self.retry.generate(&self.generator, &prompt).await {
            Ok(text) => decode_reply(&text),
            Err(e) => {
                warn!(error = %e, "model call failed, degrading result");
                upstream_error(format!("API call failed: {e}"))
            }
        };
        let sanitized = sanitize(request, &reply);
        info!(score = sanitized.result.score, clean = sanitized.result.is_clean(), "review complete");
        sanitized
    }

    /// Review a single passage in one language.
    pub async fn review_single_text(&self, text: &str, language: Language) -> ReviewResult {
        self.review_request(&ReviewRequest::single(text, language))
            .await
            .result
    }

    /// Review a sheet row's English source and Korean translation in one call.
    pub async fn review_row_both(&self, row: &Row) -> (ReviewResult, DebugBundle) {
        let Sanitized { result, debug } = self.review_request(&row.to_request()).await;
        (result, debug)
    }
}
