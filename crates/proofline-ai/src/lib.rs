//! LLM layer: review prompt, Gemini client, retry policy and the sanitizing reviewer.

pub mod gemini;
pub mod generator;
pub mod prompt;
pub mod retry;
pub mod reviewer;

pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::{GenerateError, Generator};
pub use retry::RetryPolicy;
pub use reviewer::Reviewer;
