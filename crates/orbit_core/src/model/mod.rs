//! Domain model for the student planner.
//!
//! # Responsibility
//! - Define canonical records for academic, planning and finance data.
//! - Provide shared input normalization (trimming, date parsing) and
//!   validation errors used by repositories and services.
//!
//! # Invariants
//! - Every record is identified by a stable UUID and owned by one user.
//! - Timestamps are UTC with millisecond precision, matching storage.
//! - Text inputs are trimmed; empty optional text is stored as `None`.

pub mod academic;
pub mod finance;
pub mod planning;
pub mod user;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifier of the user owning a record.
pub type UserId = Uuid;

/// Record-level validation failure.
///
/// `Display` output is user-facing and returned verbatim by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field (or field group) is missing; carries the full message.
    Required(&'static str),
    /// Input is present but not acceptable; carries the full message.
    Rejected(&'static str),
    /// Enum-like field received an unknown value.
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    /// Date input could not be parsed.
    InvalidDate { field: &'static str, value: String },
    /// End date precedes start date.
    DateRangeInverted {
        start_field: &'static str,
        end_field: &'static str,
    },
    /// Numeric field is out of its accepted range.
    OutOfRange {
        field: &'static str,
        expectation: &'static str,
    },
    /// Email does not look like an address.
    InvalidEmail(String),
    /// Password shorter than the accepted minimum.
    PasswordTooShort { min_chars: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(message) | Self::Rejected(message) => write!(f, "{message}"),
            Self::InvalidChoice {
                field,
                value,
                allowed,
            } => write!(
                f,
                "invalid {field} `{value}`; expected one of: {}",
                allowed.join(", ")
            ),
            Self::InvalidDate { field, value } => write!(f, "invalid {field} `{value}`"),
            Self::DateRangeInverted {
                start_field,
                end_field,
            } => write!(f, "{end_field} must not be earlier than {start_field}"),
            Self::OutOfRange { field, expectation } => write!(f, "{field} {expectation}"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
        }
    }
}

impl Error for ValidationError {}

/// Reference to another record as sent by clients.
///
/// Clients send either the bare id or the embedded `{ "_id": ... }` shape
/// they previously received in a response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RefInput {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl RefInput {
    /// Returns the raw id text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(id) => id.as_str(),
            Self::Embedded { id } => id.as_str(),
        }
    }

    /// Parses the id; blank or malformed ids yield `None`.
    pub fn parse(&self) -> Option<Uuid> {
        Uuid::parse_str(self.as_str().trim()).ok()
    }

    /// Returns whether the reference carries no usable text.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Returns the trimmed value when it is present and non-empty.
pub fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Trims optional text, collapsing empty strings to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    required_text(value)
}

/// Parses a client-supplied date.
///
/// Accepted forms:
/// - RFC 3339 (`2025-03-01T09:30:00Z`, `2025-03-01T09:30:00+05:30`)
/// - local datetime without zone (`2025-03-01T09:30[:00[.fff]]`), read as UTC
/// - plain date (`2025-03-01`), read as midnight UTC
pub fn parse_date_input(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(truncate_to_millis(parsed.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(truncate_to_millis(naive.and_utc()));
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(ValidationError::InvalidDate {
        field,
        value: trimmed.to_string(),
    })
}

/// Parses an optional date input; absent or blank input yields `None`.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value.map(str::trim).filter(|trimmed| !trimmed.is_empty()) {
        Some(text) => parse_date_input(field, text).map(Some),
        None => Ok(None),
    }
}

/// Current time truncated to storage precision.
pub fn now_utc() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}
