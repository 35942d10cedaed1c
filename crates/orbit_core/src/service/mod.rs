//! Core use-case services.
//!
//! # Responsibility
//! - Turn client payloads into validated records (trimming, defaults,
//!   partial updates) and orchestrate repository calls.
//! - Map repository failures to user-facing messages.
//! - Keep the HTTP layer decoupled from storage details.

pub mod academic_service;
pub mod finance_service;
pub mod planning_service;
pub mod study_service;
pub mod user_service;

use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error shared by planner services.
///
/// Variants carrying `&'static str` hold the message shown to clients.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before touching storage.
    Validation(ValidationError),
    /// Target record is missing or owned by another user.
    NotFound(&'static str),
    /// Write collides with an existing record.
    Conflict(&'static str),
    /// Credentials were rejected.
    Unauthorized(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Password hashing backend failed.
    PasswordHash(String),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(message) | Self::Conflict(message) | Self::Unauthorized(message) => {
                write!(f, "{message}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::PasswordHash(details) => write!(f, "password hashing failed: {details}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Builds a mapper turning `RepoError::NotFound` into a user-facing 404.
pub(crate) fn not_found_as(message: &'static str) -> impl Fn(RepoError) -> ServiceError {
    move |err| match err {
        RepoError::NotFound(_) => ServiceError::NotFound(message),
        other => other.into(),
    }
}

/// Resolves a required text field for partial updates.
///
/// Absent input keeps `current`; blank input is rejected with `message`.
pub(crate) fn merge_required(
    current: String,
    input: Option<&str>,
    message: &'static str,
) -> Result<String, ValidationError> {
    match input {
        None => Ok(current),
        Some(text) => crate::model::required_text(Some(text)).ok_or(ValidationError::Required(message)),
    }
}

/// Resolves an optional text field for partial updates; blank input clears it.
pub(crate) fn merge_optional(current: Option<String>, input: Option<&str>) -> Option<String> {
    match input {
        None => current,
        Some(text) => crate::model::optional_text(Some(text)),
    }
}
