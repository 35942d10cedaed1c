//! Study-aid preparation for AI note processing.
//!
//! # Responsibility
//! - Validate the requested action and collect a course's notes.
//! - Render notes into one bounded text block and wrap it in an
//!   action-specific instruction prompt.
//!
//! Calling the text generator is left to the caller; this module is pure
//! apart from the note lookup.

use crate::model::academic::Note;
use crate::model::{required_text, UserId, ValidationError};
use crate::repo::academic_repo::{AcademicRepository, NoteOrder};
use crate::service::{ServiceError, ServiceResult};
use uuid::Uuid;

/// Character cap applied to the combined notes text.
pub const MAX_NOTES_CHARS: usize = 25_000;
/// Suffix appended after truncated notes text.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated due to length...]";

const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// Study aid a user can request for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyAction {
    Summarize,
    KeyConcepts,
    Quiz,
    Flashcards,
}

impl StudyAction {
    pub const NAMES: &'static [&'static str] = &["summarize", "key-concepts", "quiz", "flashcards"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "summarize" => Some(Self::Summarize),
            "key-concepts" => Some(Self::KeyConcepts),
            "quiz" => Some(Self::Quiz),
            "flashcards" => Some(Self::Flashcards),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::KeyConcepts => "key-concepts",
            Self::Quiz => "quiz",
            Self::Flashcards => "flashcards",
        }
    }
}

/// Prompt ready to be sent to a text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRequest {
    pub action: StudyAction,
    pub prompt: String,
    /// Number of notes included (before any truncation).
    pub notes_processed: usize,
    pub truncated: bool,
}

/// Joins notes as `[Note i] title` blocks, 1-based, in the given order.
pub fn combine_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| format!("[Note {}] {}\n\n{}", index + 1, note.title, note.content))
        .collect::<Vec<_>>()
        .join(NOTE_SEPARATOR)
}

/// Caps `text` at [`MAX_NOTES_CHARS`] characters, appending the marker
/// when anything was cut. Returns whether truncation happened.
pub fn truncate_notes(text: String) -> (String, bool) {
    match text.char_indices().nth(MAX_NOTES_CHARS) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
            truncated.push_str(&text[..cut]);
            truncated.push_str(TRUNCATION_MARKER);
            (truncated, true)
        }
        None => (text, false),
    }
}

/// Wraps notes text in the instruction prompt for `action`.
pub fn build_prompt(action: StudyAction, notes_text: &str) -> String {
    match action {
        StudyAction::Summarize => format!(
            "You are an expert academic assistant. Summarize the following student notes in a \
clear, concise, and well-structured manner. Focus on the main points and key information. \
Use bullet points for clarity.

Notes:
{notes_text}

Please provide a comprehensive summary:"
        ),
        StudyAction::KeyConcepts => format!(
            "You are an expert academic assistant. Extract and explain the key concepts and \
important terms from the following student notes. For each concept, provide:
- The concept name (bold)
- A clear, brief explanation
- Why it's important (if relevant)

Notes:
{notes_text}

Please list the key concepts:"
        ),
        StudyAction::Quiz => format!(
            "You are an expert academic quiz creator. Based on the following student notes, \
create a 5-question multiple-choice quiz to test understanding.

Requirements:
- Each question should test comprehension, not just memorization
- Provide 4 options (A, B, C, D) for each question
- Clearly indicate the correct answer after each question
- Include a brief explanation for why the answer is correct

Notes:
{notes_text}

Please create the quiz:"
        ),
        StudyAction::Flashcards => format!(
            "You are an expert academic study assistant. Generate 8 effective flashcards from \
the following student notes.

Format each flashcard EXACTLY as:
Front: [Question, term, or concept]
Back: [Answer, definition, or explanation]
---

Make the flashcards focused and useful for studying.

Notes:
{notes_text}

Please generate the flashcards:"
        ),
    }
}

/// Builds study prompts from stored notes.
pub struct StudyService<R: AcademicRepository> {
    repo: R,
}

impl<R: AcademicRepository> StudyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates the request and renders the prompt for one course.
    ///
    /// Notes are taken newest first. A course id that is not a valid id, or
    /// names a course without notes for this user, yields `NotFound`.
    pub fn prepare(
        &self,
        user: UserId,
        course_id: Option<&str>,
        action: Option<&str>,
    ) -> ServiceResult<StudyRequest> {
        let course_id = required_text(course_id);
        let action = required_text(action);
        let (Some(course_id), Some(action)) = (course_id, action) else {
            return Err(ValidationError::Required("Course ID and action are required.").into());
        };
        let action = StudyAction::parse(&action).ok_or(ValidationError::Rejected(
            "Invalid action. Must be one of: summarize, key-concepts, quiz, flashcards",
        ))?;

        let notes = match Uuid::parse_str(&course_id) {
            Ok(course) => self
                .repo
                .list_notes_for_course(user, course, NoteOrder::RecentlyCreated)?,
            Err(_) => Vec::new(),
        };
        if notes.is_empty() {
            return Err(ServiceError::NotFound(
                "No notes found for this course. Please create some notes first.",
            ));
        }

        let combined = combine_notes(&notes);
        let combined_chars = combined.chars().count();
        let (notes_text, truncated) = truncate_notes(combined);
        if truncated {
            log::warn!(
                "event=study_prepare module=service status=truncated from_chars={combined_chars} to_chars={MAX_NOTES_CHARS}"
            );
        }

        Ok(StudyRequest {
            action,
            prompt: build_prompt(action, &notes_text),
            notes_processed: notes.len(),
            truncated,
        })
    }
}
