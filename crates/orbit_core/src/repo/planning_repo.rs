//! Task/goal repository contracts and SQLite implementation.

use crate::model::planning::{Goal, GoalCategory, GoalId, GoalStatus, Task, TaskId};
use crate::model::UserId;
use crate::repo::{
    bool_to_int, expect_changed, from_millis, int_to_bool, parse_id, to_millis, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    due_date,
    is_completed,
    created_at,
    updated_at
FROM tasks";

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    category,
    status,
    created_at,
    updated_at
FROM goals";

/// Repository interface for tasks and goals.
pub trait PlanningRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, user: UserId, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks by due date ascending.
    fn list_tasks(&self, user: UserId) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, user: UserId, id: TaskId) -> RepoResult<()>;

    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    fn update_goal(&self, goal: &Goal) -> RepoResult<()>;
    fn get_goal(&self, user: UserId, id: GoalId) -> RepoResult<Option<Goal>>;
    /// Lists goals newest first.
    fn list_goals(&self, user: UserId) -> RepoResult<Vec<Goal>>;
    fn delete_goal(&self, user: UserId, id: GoalId) -> RepoResult<()>;
}

/// SQLite-backed planning repository.
pub struct SqlitePlanningRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanningRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PlanningRepository for SqlitePlanningRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (id, user_id, title, due_date, is_completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.id.to_string(),
                task.user.to_string(),
                task.title.as_str(),
                to_millis(task.due_date),
                bool_to_int(task.is_completed),
                to_millis(task.created_at),
                to_millis(task.updated_at),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                due_date = ?2,
                is_completed = ?3,
                updated_at = ?4
             WHERE id = ?5
               AND user_id = ?6;",
            params![
                task.title.as_str(),
                to_millis(task.due_date),
                bool_to_int(task.is_completed),
                to_millis(task.updated_at),
                task.id.to_string(),
                task.user.to_string(),
            ],
        )?;

        expect_changed(changed, task.id)
    }

    fn get_task(&self, user: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_tasks(&self, user: UserId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE user_id = ?1 ORDER BY due_date ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, user: UserId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        expect_changed(changed, id)
    }

    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (
                id,
                user_id,
                title,
                description,
                category,
                status,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                goal.id.to_string(),
                goal.user.to_string(),
                goal.title.as_str(),
                goal.description.as_deref(),
                goal.category.as_db(),
                goal.status.as_db(),
                to_millis(goal.created_at),
                to_millis(goal.updated_at),
            ],
        )?;

        Ok(goal.id)
    }

    fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        goal.validate()?;

        let changed = self.conn.execute(
            "UPDATE goals
             SET
                title = ?1,
                description = ?2,
                category = ?3,
                status = ?4,
                updated_at = ?5
             WHERE id = ?6
               AND user_id = ?7;",
            params![
                goal.title.as_str(),
                goal.description.as_deref(),
                goal.category.as_db(),
                goal.status.as_db(),
                to_millis(goal.updated_at),
                goal.id.to_string(),
                goal.user.to_string(),
            ],
        )?;

        expect_changed(changed, goal.id)
    }

    fn get_goal(&self, user: UserId, id: GoalId) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_goal_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_goals(&self, user: UserId) -> RepoResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GOAL_SELECT_SQL} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }

    fn delete_goal(&self, user: UserId, id: GoalId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM goals WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        expect_changed(changed, id)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    Ok(Task {
        id: parse_id("tasks.id", &id_text)?,
        user: parse_id("tasks.user_id", &user_text)?,
        title: row.get("title")?,
        due_date: from_millis("tasks.due_date", row.get("due_date")?)?,
        is_completed: int_to_bool("tasks.is_completed", row.get("is_completed")?)?,
        created_at: from_millis("tasks.created_at", row.get("created_at")?)?,
        updated_at: from_millis("tasks.updated_at", row.get("updated_at")?)?,
    })
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let category_text: String = row.get("category")?;
    let status_text: String = row.get("status")?;

    let category = GoalCategory::from_db(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid goal category `{category_text}` in goals.category"))
    })?;
    let status = GoalStatus::from_db(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid goal status `{status_text}` in goals.status"))
    })?;

    Ok(Goal {
        id: parse_id("goals.id", &id_text)?,
        user: parse_id("goals.user_id", &user_text)?,
        title: row.get("title")?,
        description: row.get("description")?,
        category,
        status,
        created_at: from_millis("goals.created_at", row.get("created_at")?)?,
        updated_at: from_millis("goals.updated_at", row.get("updated_at")?)?,
    })
}
