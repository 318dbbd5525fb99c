//! # AI Module
//!
//! Turns free text into a structured transaction with a hosted language model.
//! [`prompt`] builds the instruction, [`LanguageModel`] performs the one-shot
//! call, and [`response`] strips fences and parses the model's JSON. Model
//! output is untrusted: callers re-normalize it before use.

pub mod gemini;
pub mod prompt;
pub mod response;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use prompt::build_prompt;
pub use response::{parse_model_output, strip_code_fences, ModelTransaction};

#[derive(Debug, Error)]
pub enum AiError {
    #[error("language model is not configured: {0}")]
    Configuration(String),

    #[error("language model request failed: {0}")]
    Service(#[from] reqwest::Error),

    #[error("language model returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The raw text is kept so it can be logged
    #[error("language model returned malformed output: {reason}")]
    MalformedResponse { raw: String, reason: String },
}

/// One-shot text generation: prompt in, text out
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
