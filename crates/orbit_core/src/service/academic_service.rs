//! Course, assignment and note use-cases.
//!
//! # Responsibility
//! - Build validated academic records from client payloads.
//! - Enforce that assignments and notes only reference the caller's courses.
//!
//! # Invariants
//! - Updates are partial: absent payload fields keep stored values.
//! - Every write is followed by a read-back so callers see stored state.

use crate::model::academic::{
    normalize_schedule_days, Assignment, AssignmentId, AssignmentInput, AssignmentStatus, Course,
    CourseId, CourseInput, CourseRef, Note, NoteId, NoteInput,
};
use crate::model::{
    now_utc, optional_text, parse_date_input, parse_optional_date, required_text, RefInput,
    UserId, ValidationError,
};
use crate::repo::academic_repo::{AcademicRepository, NoteOrder};
use crate::service::{merge_optional, merge_required, not_found_as, ServiceError, ServiceResult};
use uuid::Uuid;

const COURSE_NOT_FOUND: &str = "Course not found";
const ASSIGNMENT_NOT_FOUND: &str = "Assignment not found";
const NOTE_NOT_FOUND: &str = "Note not found";

/// Academic service facade over repository implementations.
pub struct AcademicService<R: AcademicRepository> {
    repo: R,
}

impl<R: AcademicRepository> AcademicService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the user's courses, newest first.
    pub fn list_courses(&self, user: UserId) -> ServiceResult<Vec<Course>> {
        Ok(self.repo.list_courses(user)?)
    }

    pub fn create_course(&self, user: UserId, input: &CourseInput) -> ServiceResult<Course> {
        let course_name = required_text(input.course_name.as_deref())
            .ok_or(ValidationError::Required("Course name is required"))?;
        let now = now_utc();
        let course = Course {
            id: Uuid::new_v4(),
            user,
            course_name,
            course_code: optional_text(input.course_code.as_deref()),
            instructor: optional_text(input.instructor.as_deref()),
            schedule_days: input
                .schedule_days
                .as_deref()
                .map(normalize_schedule_days)
                .unwrap_or_default(),
            schedule_start_time: optional_text(input.schedule_start_time.as_deref()),
            schedule_end_time: optional_text(input.schedule_end_time.as_deref()),
            start_date: parse_optional_date("startDate", input.start_date.as_deref())?,
            end_date: parse_optional_date("endDate", input.end_date.as_deref())?,
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_course(&course)?;
        self.read_back_course(user, id, "created course not found in read-back")
    }

    /// Applies a partial update to one course.
    pub fn update_course(
        &self,
        user: UserId,
        id: CourseId,
        input: &CourseInput,
    ) -> ServiceResult<Course> {
        let current = self
            .repo
            .get_course(user, id)?
            .ok_or(ServiceError::NotFound(COURSE_NOT_FOUND))?;

        let start_date = match input.start_date.as_deref() {
            Some(text) => parse_optional_date("startDate", Some(text))?,
            None => current.start_date,
        };
        let end_date = match input.end_date.as_deref() {
            Some(text) => parse_optional_date("endDate", Some(text))?,
            None => current.end_date,
        };
        let course = Course {
            course_name: merge_required(
                current.course_name,
                input.course_name.as_deref(),
                "Course name is required",
            )?,
            course_code: merge_optional(current.course_code, input.course_code.as_deref()),
            instructor: merge_optional(current.instructor, input.instructor.as_deref()),
            schedule_days: match input.schedule_days.as_deref() {
                Some(days) => normalize_schedule_days(days),
                None => current.schedule_days,
            },
            schedule_start_time: merge_optional(
                current.schedule_start_time,
                input.schedule_start_time.as_deref(),
            ),
            schedule_end_time: merge_optional(
                current.schedule_end_time,
                input.schedule_end_time.as_deref(),
            ),
            start_date,
            end_date,
            updated_at: now_utc(),
            ..current
        };

        self.repo
            .update_course(&course)
            .map_err(not_found_as(COURSE_NOT_FOUND))?;
        self.read_back_course(user, id, "updated course not found in read-back")
    }

    /// Deletes a course with its assignments and notes.
    pub fn delete_course(&self, user: UserId, id: CourseId) -> ServiceResult<()> {
        self.repo
            .delete_course(user, id)
            .map_err(not_found_as(COURSE_NOT_FOUND))?;
        log::info!("event=course_delete module=service status=ok course_id={id}");
        Ok(())
    }

    /// Lists the user's assignments by due date.
    pub fn list_assignments(&self, user: UserId) -> ServiceResult<Vec<Assignment>> {
        Ok(self.repo.list_assignments(user)?)
    }

    pub fn create_assignment(
        &self,
        user: UserId,
        input: &AssignmentInput,
    ) -> ServiceResult<Assignment> {
        let title = required_text(input.title.as_deref());
        let due_date = required_text(input.due_date.as_deref());
        let course = input.course.as_ref().filter(|course| !course.is_blank());
        let (Some(title), Some(due_date), Some(course)) = (title, due_date, course) else {
            return Err(
                ValidationError::Required("Title, due date, and course are required").into(),
            );
        };

        let due_date = parse_date_input("dueDate", &due_date)?;
        let status = parse_assignment_status(input.status.as_deref())?.unwrap_or_default();
        let course = self.owned_course_ref(user, course)?;
        let now = now_utc();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            user,
            course,
            title,
            due_date,
            status,
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_assignment(&assignment)?;
        self.repo
            .get_assignment(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "created assignment not found in read-back",
            ))
    }

    /// Applies a partial update; `course` may move the assignment to another
    /// owned course.
    pub fn update_assignment(
        &self,
        user: UserId,
        id: AssignmentId,
        input: &AssignmentInput,
    ) -> ServiceResult<Assignment> {
        let current = self
            .repo
            .get_assignment(user, id)?
            .ok_or(ServiceError::NotFound(ASSIGNMENT_NOT_FOUND))?;

        let due_date = match input.due_date.as_deref() {
            Some(text) => {
                let text = required_text(Some(text))
                    .ok_or(ValidationError::Required("Please add a due date"))?;
                parse_date_input("dueDate", &text)?
            }
            None => current.due_date,
        };
        let course = match input.course.as_ref() {
            Some(reference) => self.owned_course_ref(user, reference)?,
            None => current.course,
        };
        let assignment = Assignment {
            title: merge_required(
                current.title,
                input.title.as_deref(),
                "Please add an assignment title",
            )?,
            due_date,
            status: parse_assignment_status(input.status.as_deref())?.unwrap_or(current.status),
            course,
            updated_at: now_utc(),
            ..current
        };

        self.repo
            .update_assignment(&assignment)
            .map_err(not_found_as(ASSIGNMENT_NOT_FOUND))?;
        self.repo
            .get_assignment(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "updated assignment not found in read-back",
            ))
    }

    pub fn delete_assignment(&self, user: UserId, id: AssignmentId) -> ServiceResult<()> {
        self.repo
            .delete_assignment(user, id)
            .map_err(not_found_as(ASSIGNMENT_NOT_FOUND))
    }

    /// Lists notes of one course, most recently edited first.
    ///
    /// A course the user does not own simply has no notes.
    pub fn list_notes(&self, user: UserId, course: CourseId) -> ServiceResult<Vec<Note>> {
        Ok(self
            .repo
            .list_notes_for_course(user, course, NoteOrder::RecentlyUpdated)?)
    }

    pub fn create_note(&self, user: UserId, input: &NoteInput) -> ServiceResult<Note> {
        let title = required_text(input.title.as_deref());
        let course = input.course.as_ref().filter(|course| !course.is_blank());
        let (Some(title), Some(course)) = (title, course) else {
            return Err(ValidationError::Required("Title and course are required").into());
        };

        let course = self.owned_course_ref(user, course)?;
        let now = now_utc();
        let note = Note {
            id: Uuid::new_v4(),
            user,
            course: course.id,
            title,
            content: input.content.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_note(&note)?;
        self.repo
            .get_note(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Updates title and/or content; the note stays on its course.
    pub fn update_note(&self, user: UserId, id: NoteId, input: &NoteInput) -> ServiceResult<Note> {
        let current = self
            .repo
            .get_note(user, id)?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;

        let note = Note {
            title: merge_required(current.title, input.title.as_deref(), "Please add a title")?,
            content: input.content.clone().unwrap_or(current.content),
            updated_at: now_utc(),
            ..current
        };

        self.repo
            .update_note(&note)
            .map_err(not_found_as(NOTE_NOT_FOUND))?;
        self.repo
            .get_note(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    pub fn delete_note(&self, user: UserId, id: NoteId) -> ServiceResult<()> {
        self.repo
            .delete_note(user, id)
            .map_err(not_found_as(NOTE_NOT_FOUND))
    }

    fn owned_course_ref(&self, user: UserId, reference: &RefInput) -> ServiceResult<CourseRef> {
        let course_id = reference
            .parse()
            .ok_or(ServiceError::NotFound(COURSE_NOT_FOUND))?;
        let course = self
            .repo
            .get_course(user, course_id)?
            .ok_or(ServiceError::NotFound(COURSE_NOT_FOUND))?;
        Ok(CourseRef {
            id: course.id,
            course_name: course.course_name,
        })
    }

    fn read_back_course(
        &self,
        user: UserId,
        id: CourseId,
        details: &'static str,
    ) -> ServiceResult<Course> {
        self.repo
            .get_course(user, id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}

fn parse_assignment_status(value: Option<&str>) -> ServiceResult<Option<AssignmentStatus>> {
    match optional_text(value) {
        Some(label) => Ok(Some(AssignmentStatus::from_label(&label)?)),
        None => Ok(None),
    }
}
