//! Task and goal use-cases.

use crate::model::planning::{
    Goal, GoalCategory, GoalId, GoalInput, GoalStatus, Task, TaskId, TaskInput,
};
use crate::model::{now_utc, optional_text, parse_date_input, required_text, UserId, ValidationError};
use crate::repo::planning_repo::PlanningRepository;
use crate::service::{merge_optional, merge_required, not_found_as, ServiceError, ServiceResult};
use uuid::Uuid;

const TASK_NOT_FOUND: &str = "Task not found";
const GOAL_NOT_FOUND: &str = "Goal not found";

/// Planning service facade over repository implementations.
pub struct PlanningService<R: PlanningRepository> {
    repo: R,
}

impl<R: PlanningRepository> PlanningService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_tasks(&self, user: UserId) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(user)?)
    }

    /// Creates an open task; `isCompleted` in the payload is ignored.
    pub fn create_task(&self, user: UserId, input: &TaskInput) -> ServiceResult<Task> {
        let title = required_text(input.title.as_deref());
        let due_date = required_text(input.due_date.as_deref());
        let (Some(title), Some(due_date)) = (title, due_date) else {
            return Err(ValidationError::Required("Title and due date are required").into());
        };

        let now = now_utc();
        let task = Task {
            id: Uuid::new_v4(),
            user,
            title,
            due_date: parse_date_input("dueDate", &due_date)?,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_task(&task)?;
        self.repo
            .get_task(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    pub fn update_task(&self, user: UserId, id: TaskId, input: &TaskInput) -> ServiceResult<Task> {
        let current = self
            .repo
            .get_task(user, id)?
            .ok_or(ServiceError::NotFound(TASK_NOT_FOUND))?;

        let due_date = match input.due_date.as_deref() {
            Some(text) => {
                let text = required_text(Some(text))
                    .ok_or(ValidationError::Required("Please add a due date"))?;
                parse_date_input("dueDate", &text)?
            }
            None => current.due_date,
        };
        let task = Task {
            title: merge_required(current.title, input.title.as_deref(), "Please add a task title")?,
            due_date,
            is_completed: input.is_completed.unwrap_or(current.is_completed),
            updated_at: now_utc(),
            ..current
        };

        self.repo
            .update_task(&task)
            .map_err(not_found_as(TASK_NOT_FOUND))?;
        self.repo
            .get_task(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "updated task not found in read-back",
            ))
    }

    pub fn delete_task(&self, user: UserId, id: TaskId) -> ServiceResult<()> {
        self.repo
            .delete_task(user, id)
            .map_err(not_found_as(TASK_NOT_FOUND))
    }

    pub fn list_goals(&self, user: UserId) -> ServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals(user)?)
    }

    pub fn create_goal(&self, user: UserId, input: &GoalInput) -> ServiceResult<Goal> {
        let title = required_text(input.title.as_deref())
            .ok_or(ValidationError::Required("Title is required"))?;

        let now = now_utc();
        let goal = Goal {
            id: Uuid::new_v4(),
            user,
            title,
            description: optional_text(input.description.as_deref()),
            category: parse_label(input.category.as_deref(), GoalCategory::from_label)?
                .unwrap_or_default(),
            status: parse_label(input.status.as_deref(), GoalStatus::from_label)?
                .unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_goal(&goal)?;
        self.repo
            .get_goal(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "created goal not found in read-back",
            ))
    }

    pub fn update_goal(&self, user: UserId, id: GoalId, input: &GoalInput) -> ServiceResult<Goal> {
        let current = self
            .repo
            .get_goal(user, id)?
            .ok_or(ServiceError::NotFound(GOAL_NOT_FOUND))?;

        let goal = Goal {
            title: merge_required(current.title, input.title.as_deref(), "Please add a goal title")?,
            description: merge_optional(current.description, input.description.as_deref()),
            category: parse_label(input.category.as_deref(), GoalCategory::from_label)?
                .unwrap_or(current.category),
            status: parse_label(input.status.as_deref(), GoalStatus::from_label)?
                .unwrap_or(current.status),
            updated_at: now_utc(),
            ..current
        };

        self.repo
            .update_goal(&goal)
            .map_err(not_found_as(GOAL_NOT_FOUND))?;
        self.repo
            .get_goal(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "updated goal not found in read-back",
            ))
    }

    pub fn delete_goal(&self, user: UserId, id: GoalId) -> ServiceResult<()> {
        self.repo
            .delete_goal(user, id)
            .map_err(not_found_as(GOAL_NOT_FOUND))
    }
}

/// Parses an optional enum label; blank input counts as absent.
fn parse_label<T>(
    value: Option<&str>,
    parse: fn(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    optional_text(value).map(|label| parse(&label)).transpose()
}
