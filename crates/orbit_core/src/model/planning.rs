//! Task and goal records.

use crate::model::{UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TaskId = Uuid;
pub type GoalId = Uuid;

/// Dated to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub user: UserId,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Please add a task title"));
        }
        Ok(())
    }
}

/// Task create/update payload. `is_completed` is ignored on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: Option<bool>,
}

/// Goal grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GoalCategory {
    Academic,
    #[default]
    Personal,
    Career,
    Health,
    Other,
}

impl GoalCategory {
    pub const LABELS: &'static [&'static str] =
        &["Academic", "Personal", "Career", "Health", "Other"];

    pub fn from_label(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Academic" => Ok(Self::Academic),
            "Personal" => Ok(Self::Personal),
            "Career" => Ok(Self::Career),
            "Health" => Ok(Self::Health),
            "Other" => Ok(Self::Other),
            other => Err(ValidationError::InvalidChoice {
                field: "category",
                value: other.to_string(),
                allowed: Self::LABELS,
            }),
        }
    }

    pub fn as_db(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Personal => "personal",
            Self::Career => "career",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "academic" => Some(Self::Academic),
            "personal" => Some(Self::Personal),
            "career" => Some(Self::Career),
            "health" => Some(Self::Health),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Goal progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Achieved")]
    Achieved,
}

impl GoalStatus {
    pub const LABELS: &'static [&'static str] = &["Not Started", "In Progress", "Achieved"];

    pub fn from_label(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Not Started" => Ok(Self::NotStarted),
            "In Progress" => Ok(Self::InProgress),
            "Achieved" => Ok(Self::Achieved),
            other => Err(ValidationError::InvalidChoice {
                field: "status",
                value: other.to_string(),
                allowed: Self::LABELS,
            }),
        }
    }

    pub fn as_db(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Achieved => "achieved",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "achieved" => Some(Self::Achieved),
            _ => None,
        }
    }
}

/// Longer-term objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "_id")]
    pub id: GoalId,
    pub user: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Please add a goal title"));
        }
        Ok(())
    }
}

/// Goal create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}
