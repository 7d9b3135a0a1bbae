//! The text-generation seam.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model returned no candidate text")]
    EmptyResponse,
}

/// Something that turns a prompt into raw reply text.
///
/// The reply is expected to be JSON but is never trusted to be.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        (**self).generate(prompt).await
    }
}
