//! Course/assignment/note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the academic records of one user.
//! - Resolve the embedded course reference returned with assignments.
//!
//! # Invariants
//! - Deleting a course removes its assignments and notes (FK cascade).
//! - Course list is ordered newest first; assignments by due date ascending.

use crate::model::academic::{
    Assignment, AssignmentId, AssignmentStatus, Course, CourseId, CourseRef, Note, NoteId,
};
use crate::model::UserId;
use crate::repo::{
    expect_changed, from_millis, from_optional_millis, parse_id, to_millis, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    course_name,
    course_code,
    instructor,
    schedule_days,
    schedule_start_time,
    schedule_end_time,
    start_date,
    end_date,
    created_at,
    updated_at
FROM courses";

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    a.id,
    a.user_id,
    a.course_id,
    c.course_name,
    a.title,
    a.due_date,
    a.status,
    a.created_at,
    a.updated_at
FROM assignments a
INNER JOIN courses c ON c.id = a.course_id";

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    course_id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// Ordering for per-course note listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteOrder {
    /// Most recently edited first.
    #[default]
    RecentlyUpdated,
    /// Most recently created first.
    RecentlyCreated,
}

impl NoteOrder {
    fn order_by(self) -> &'static str {
        match self {
            Self::RecentlyUpdated => "updated_at DESC, rowid DESC",
            Self::RecentlyCreated => "created_at DESC, rowid DESC",
        }
    }
}

/// Repository interface for academic records.
pub trait AcademicRepository {
    fn create_course(&self, course: &Course) -> RepoResult<CourseId>;
    fn update_course(&self, course: &Course) -> RepoResult<()>;
    fn get_course(&self, user: UserId, id: CourseId) -> RepoResult<Option<Course>>;
    fn list_courses(&self, user: UserId) -> RepoResult<Vec<Course>>;
    /// Deletes a course together with its assignments and notes.
    fn delete_course(&self, user: UserId, id: CourseId) -> RepoResult<()>;

    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<AssignmentId>;
    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()>;
    fn get_assignment(&self, user: UserId, id: AssignmentId) -> RepoResult<Option<Assignment>>;
    fn list_assignments(&self, user: UserId) -> RepoResult<Vec<Assignment>>;
    fn delete_assignment(&self, user: UserId, id: AssignmentId) -> RepoResult<()>;

    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn get_note(&self, user: UserId, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes_for_course(
        &self,
        user: UserId,
        course: CourseId,
        order: NoteOrder,
    ) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, user: UserId, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed academic repository.
pub struct SqliteAcademicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAcademicRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AcademicRepository for SqliteAcademicRepository<'_> {
    fn create_course(&self, course: &Course) -> RepoResult<CourseId> {
        course.validate()?;

        self.conn.execute(
            "INSERT INTO courses (
                id,
                user_id,
                course_name,
                course_code,
                instructor,
                schedule_days,
                schedule_start_time,
                schedule_end_time,
                start_date,
                end_date,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                course.id.to_string(),
                course.user.to_string(),
                course.course_name.as_str(),
                course.course_code.as_deref(),
                course.instructor.as_deref(),
                encode_schedule_days(&course.schedule_days)?,
                course.schedule_start_time.as_deref(),
                course.schedule_end_time.as_deref(),
                course.start_date.map(to_millis),
                course.end_date.map(to_millis),
                to_millis(course.created_at),
                to_millis(course.updated_at),
            ],
        )?;

        Ok(course.id)
    }

    fn update_course(&self, course: &Course) -> RepoResult<()> {
        course.validate()?;

        let changed = self.conn.execute(
            "UPDATE courses
             SET
                course_name = ?1,
                course_code = ?2,
                instructor = ?3,
                schedule_days = ?4,
                schedule_start_time = ?5,
                schedule_end_time = ?6,
                start_date = ?7,
                end_date = ?8,
                updated_at = ?9
             WHERE id = ?10
               AND user_id = ?11;",
            params![
                course.course_name.as_str(),
                course.course_code.as_deref(),
                course.instructor.as_deref(),
                encode_schedule_days(&course.schedule_days)?,
                course.schedule_start_time.as_deref(),
                course.schedule_end_time.as_deref(),
                course.start_date.map(to_millis),
                course.end_date.map(to_millis),
                to_millis(course.updated_at),
                course.id.to_string(),
                course.user.to_string(),
            ],
        )?;

        expect_changed(changed, course.id)
    }

    fn get_course(&self, user: UserId, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }

        Ok(None)
    }

    fn list_courses(&self, user: UserId) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }

        Ok(courses)
    }

    fn delete_course(&self, user: UserId, id: CourseId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM courses WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;

        expect_changed(changed, id)
    }

    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<AssignmentId> {
        assignment.validate()?;

        self.conn.execute(
            "INSERT INTO assignments (
                id,
                user_id,
                course_id,
                title,
                due_date,
                status,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                assignment.id.to_string(),
                assignment.user.to_string(),
                assignment.course.id.to_string(),
                assignment.title.as_str(),
                to_millis(assignment.due_date),
                assignment.status.as_db(),
                to_millis(assignment.created_at),
                to_millis(assignment.updated_at),
            ],
        )?;

        Ok(assignment.id)
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        assignment.validate()?;

        let changed = self.conn.execute(
            "UPDATE assignments
             SET
                course_id = ?1,
                title = ?2,
                due_date = ?3,
                status = ?4,
                updated_at = ?5
             WHERE id = ?6
               AND user_id = ?7;",
            params![
                assignment.course.id.to_string(),
                assignment.title.as_str(),
                to_millis(assignment.due_date),
                assignment.status.as_db(),
                to_millis(assignment.updated_at),
                assignment.id.to_string(),
                assignment.user.to_string(),
            ],
        )?;

        expect_changed(changed, assignment.id)
    }

    fn get_assignment(&self, user: UserId, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE a.id = ?1
               AND a.user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assignment_row(row)?));
        }

        Ok(None)
    }

    fn list_assignments(&self, user: UserId) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE a.user_id = ?1
             ORDER BY a.due_date ASC, a.rowid ASC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }

        Ok(assignments)
    }

    fn delete_assignment(&self, user: UserId, id: AssignmentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM assignments WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;

        expect_changed(changed, id)
    }

    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                id,
                user_id,
                course_id,
                title,
                content,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                note.id.to_string(),
                note.user.to_string(),
                note.course.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                to_millis(note.created_at),
                to_millis(note.updated_at),
            ],
        )?;

        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                content = ?2,
                updated_at = ?3
             WHERE id = ?4
               AND user_id = ?5;",
            params![
                note.title.as_str(),
                note.content.as_str(),
                to_millis(note.updated_at),
                note.id.to_string(),
                note.user.to_string(),
            ],
        )?;

        expect_changed(changed, note.id)
    }

    fn get_note(&self, user: UserId, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes_for_course(
        &self,
        user: UserId,
        course: CourseId,
        order: NoteOrder,
    ) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE user_id = ?1
               AND course_id = ?2
             ORDER BY {};",
            order.order_by()
        ))?;

        let mut rows = stmt.query(params![user.to_string(), course.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn delete_note(&self, user: UserId, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;

        expect_changed(changed, id)
    }
}

fn encode_schedule_days(days: &[String]) -> RepoResult<String> {
    serde_json::to_string(days)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode schedule days: {err}")))
}

fn decode_schedule_days(value: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid schedule days `{value}` in courses.schedule_days"
        ))
    })
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let days_text: String = row.get("schedule_days")?;

    let course = Course {
        id: parse_id("courses.id", &id_text)?,
        user: parse_id("courses.user_id", &user_text)?,
        course_name: row.get("course_name")?,
        course_code: row.get("course_code")?,
        instructor: row.get("instructor")?,
        schedule_days: decode_schedule_days(&days_text)?,
        schedule_start_time: row.get("schedule_start_time")?,
        schedule_end_time: row.get("schedule_end_time")?,
        start_date: from_optional_millis("courses.start_date", row.get("start_date")?)?,
        end_date: from_optional_millis("courses.end_date", row.get("end_date")?)?,
        created_at: from_millis("courses.created_at", row.get("created_at")?)?,
        updated_at: from_millis("courses.updated_at", row.get("updated_at")?)?,
    };
    course.validate()?;
    Ok(course)
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let course_text: String = row.get("course_id")?;
    let status_text: String = row.get("status")?;
    let status = AssignmentStatus::from_db(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid assignment status `{status_text}` in assignments.status"
        ))
    })?;

    Ok(Assignment {
        id: parse_id("assignments.id", &id_text)?,
        user: parse_id("assignments.user_id", &user_text)?,
        course: CourseRef {
            id: parse_id("assignments.course_id", &course_text)?,
            course_name: row.get("course_name")?,
        },
        title: row.get("title")?,
        due_date: from_millis("assignments.due_date", row.get("due_date")?)?,
        status,
        created_at: from_millis("assignments.created_at", row.get("created_at")?)?,
        updated_at: from_millis("assignments.updated_at", row.get("updated_at")?)?,
    })
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let course_text: String = row.get("course_id")?;

    Ok(Note {
        id: parse_id("notes.id", &id_text)?,
        user: parse_id("notes.user_id", &user_text)?,
        course: parse_id("notes.course_id", &course_text)?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: from_millis("notes.created_at", row.get("created_at")?)?,
        updated_at: from_millis("notes.updated_at", row.get("updated_at")?)?,
    })
}
