//! Google Generative Language REST client.
//!
//! # Invariants
//! - Candidates are tried in [`MODEL_CANDIDATES`] order; the first usable
//!   answer wins.
//! - A 2xx response without text counts as a failed candidate.
//! - When every candidate fails, the reported error is derived from the
//!   last failure only.
//! - The API key never appears in log lines.

use super::{AiError, Generation, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// `(api version, model)` pairs in fallback order.
pub const MODEL_CANDIDATES: &[(&str, &str)] = &[
    ("v1", "gemini-2.5-flash"),
    ("v1beta", "gemini-2.5-flash"),
    ("v1", "gemini-1.5-flash"),
    ("v1beta", "gemini-1.5-flash"),
    ("v1", "gemini-1.5-pro"),
    ("v1beta", "gemini-1.5-pro"),
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Why one candidate did not produce text.
#[derive(Debug)]
struct AttemptFailure {
    status: Option<u16>,
    message: String,
}

impl AttemptFailure {
    fn into_error(self) -> AiError {
        match self.status {
            Some(400) => AiError::InvalidRequest,
            Some(403) => AiError::PermissionDenied,
            Some(404) => AiError::EndpointNotFound,
            Some(429) => AiError::QuotaExceeded,
            _ => AiError::Upstream(self.message),
        }
    }
}

/// Gemini client with model fallback.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client; a missing key makes every call fail with
    /// `NotConfigured` without touching the network.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AiError::Upstream(format!("cannot build HTTP client: {err}")))?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn try_candidate(
        &self,
        api_key: &str,
        endpoint: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, AttemptFailure> {
        let url = format!(
            "{}/{endpoint}/models/{model}:generateContent?key={api_key}",
            self.base_url
        );
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AttemptFailure {
                status: err.status().map(|status| status.as_u16()),
                message: err.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(AttemptFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed = response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| AttemptFailure {
                status: None,
                message: err.without_url().to_string(),
            })?;
        parsed.into_first_text().ok_or_else(|| AttemptFailure {
            status: None,
            message: "Invalid response format from AI".to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, AiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            log::error!("event=ai_generate module=ai status=error reason=missing_api_key");
            return Err(AiError::NotConfigured);
        };

        let mut last_failure = None;
        for (endpoint, model) in MODEL_CANDIDATES {
            match self.try_candidate(api_key, endpoint, model, prompt).await {
                Ok(text) => {
                    log::info!(
                        "event=ai_generate module=ai status=ok endpoint={endpoint} model={model} prompt_chars={}",
                        prompt.chars().count()
                    );
                    return Ok(Generation {
                        text,
                        model: (*model).to_string(),
                    });
                }
                Err(failure) => {
                    log::warn!(
                        "event=ai_generate module=ai status=retry endpoint={endpoint} model={model} http_status={} error={}",
                        failure.status.map_or_else(|| "none".to_string(), |code| code.to_string()),
                        failure.message
                    );
                    last_failure = Some(failure);
                }
            }
        }

        let error = last_failure.map_or_else(
            || AiError::Upstream("Unknown error".to_string()),
            AttemptFailure::into_error,
        );
        log::error!("event=ai_generate module=ai status=error error={error}");
        Err(error)
    }
}
