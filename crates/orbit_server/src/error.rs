//! HTTP error mapping.
//!
//! Every failure leaves the server as JSON `{ "message": ... }`; AI
//! failures additionally carry `"success": false`.

use crate::ai::AiError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orbit_core::{RepoError, ServiceError};
use serde_json::json;
use thiserror::Error;

/// Error returned by request handlers and extractors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// Text generation is not set up on this server.
    #[error("{0}")]
    AiUnavailable(String),
    /// Text generation backend failed.
    #[error("{0}")]
    AiUpstream(String),
    /// Details are logged, never sent to clients.
    #[error("Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn internal(details: impl Into<String>) -> Self {
        let details = details.into();
        log::error!("event=request_failed module=http status=error error={details}");
        Self::Internal(details)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::AiUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AiUpstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::AiUnavailable(message) | Self::AiUpstream(message) => {
                json!({ "success": false, "message": message })
            }
            other => json!({ "message": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            ServiceError::NotFound(message) => Self::NotFound(message),
            ServiceError::Conflict(message) => Self::Conflict(message),
            ServiceError::Unauthorized(message) => Self::Unauthorized(message),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl From<AiError> for ApiError {
    fn from(value: AiError) -> Self {
        match value {
            err @ AiError::NotConfigured => Self::AiUnavailable(err.to_string()),
            other => Self::AiUpstream(other.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(value: actix_web::error::BlockingError) -> Self {
        Self::internal(format!("blocking task failed: {value}"))
    }
}
