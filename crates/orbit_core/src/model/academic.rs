//! Course, assignment and note records.
//!
//! # Invariants
//! - Assignments and notes always reference a course owned by the same user.
//! - `end_date` is never earlier than `start_date` when both are set.
//! - Assignment status is one of `To-Do | In Progress | Done`.

use crate::model::{RefInput, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CourseId = Uuid;
pub type AssignmentId = Uuid;
pub type NoteId = Uuid;

/// Course a student is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: CourseId,
    pub user: UserId,
    pub course_name: String,
    /// Catalog code such as `CS-101`; serialized as `courseId`.
    #[serde(rename = "courseId")]
    pub course_code: Option<String>,
    pub instructor: Option<String>,
    pub schedule_days: Vec<String>,
    pub schedule_start_time: Option<String>,
    pub schedule_end_time: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.course_name.trim().is_empty() {
            return Err(ValidationError::Required("Course name is required"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::DateRangeInverted {
                    start_field: "startDate",
                    end_field: "endDate",
                });
            }
        }
        Ok(())
    }
}

/// Course create/update payload; absent fields keep stored values on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub course_name: Option<String>,
    #[serde(rename = "courseId")]
    pub course_code: Option<String>,
    pub instructor: Option<String>,
    pub schedule_days: Option<Vec<String>>,
    pub schedule_start_time: Option<String>,
    pub schedule_end_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Trims schedule day names, dropping blanks and repeats while keeping order.
pub fn normalize_schedule_days(days: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(days.len());
    for day in days {
        let trimmed = day.trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Assignment progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AssignmentStatus {
    #[default]
    #[serde(rename = "To-Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl AssignmentStatus {
    pub const LABELS: &'static [&'static str] = &["To-Do", "In Progress", "Done"];

    /// Parses the client-facing label.
    pub fn from_label(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "To-Do" => Ok(Self::Todo),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            other => Err(ValidationError::InvalidChoice {
                field: "status",
                value: other.to_string(),
                allowed: Self::LABELS,
            }),
        }
    }

    pub fn as_db(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Embedded course reference returned with assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    #[serde(rename = "_id")]
    pub id: CourseId,
    pub course_name: String,
}

/// Graded piece of coursework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "_id")]
    pub id: AssignmentId,
    pub user: UserId,
    pub course: CourseRef,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Please add an assignment title"));
        }
        Ok(())
    }
}

/// Assignment create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub course: Option<RefInput>,
}

/// Lecture or study note attached to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub user: UserId,
    pub course: CourseId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Please add a title"));
        }
        Ok(())
    }
}

/// Note create/update payload. `course` is only read on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub course: Option<RefInput>,
}
