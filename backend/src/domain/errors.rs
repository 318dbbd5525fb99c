//! Error taxonomy shared by every domain service.

use crate::ai::AiError;
use thiserror::Error;

pub type FinanceResult<T> = Result<T, FinanceError>;

#[derive(Debug, Error)]
pub enum FinanceError {
    /// Missing or rejected credentials; fatal to the attempted operation
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The language model or another remote service failed; the caller may retry
    #[error("external service error: {0}")]
    ExternalService(String),

    /// The language model answered with something that is not a transaction
    #[error("malformed response from language model: {reason}")]
    MalformedResponse { raw: String, reason: String },

    /// Input rejected before any write happened
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl FinanceError {
    pub fn validation(message: impl Into<String>) -> Self {
        FinanceError::Validation(message.into())
    }

    /// Stable machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            FinanceError::Configuration(_) => "configuration",
            FinanceError::ExternalService(_) => "external_service",
            FinanceError::MalformedResponse { .. } => "malformed_response",
            FinanceError::Validation(_) => "validation",
            FinanceError::NotFound(_) => "not_found",
            FinanceError::Storage(_) => "storage",
        }
    }
}

impl From<AiError> for FinanceError {
    fn from(error: AiError) -> Self {
        match error {
            AiError::Configuration(message) => FinanceError::Configuration(message),
            AiError::Service(source) => FinanceError::ExternalService(source.to_string()),
            AiError::Api { status, body } => {
                FinanceError::ExternalService(format!("language model returned {}: {}", status, body))
            }
            AiError::MalformedResponse { raw, reason } => FinanceError::MalformedResponse { raw, reason },
        }
    }
}
