//! Text generation backends for study aids.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

/// Generated text together with the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub model: String,
}

/// Failure of a text generation request.
///
/// `Display` output is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("AI service is not configured. Please contact the administrator.")]
    NotConfigured,
    #[error("Invalid API key or request format. Please check your GEMINI_API_KEY.")]
    InvalidRequest,
    #[error(
        "API key does not have permission. Please enable the Generative Language API in Google Cloud Console."
    )]
    PermissionDenied,
    #[error("API endpoint not found. Your API key may need to be regenerated in Google AI Studio.")]
    EndpointNotFound,
    #[error("API quota exceeded. Please try again later or upgrade your quota.")]
    QuotaExceeded,
    #[error("AI service error: {0}")]
    Upstream(String),
}

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, AiError>;
}
