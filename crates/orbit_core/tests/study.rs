use orbit_core::model::academic::{CourseInput, NoteInput};
use orbit_core::model::user::RegisterInput;
use orbit_core::model::RefInput;
use orbit_core::service::study_service::{MAX_NOTES_CHARS, TRUNCATION_MARKER};
use orbit_core::{
    open_db_in_memory, AcademicService, ServiceError, SqliteAcademicRepository,
    SqliteUserRepository, StudyAction, StudyService, UserId, UserService, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_user(conn: &Connection, email: &str) -> UserId {
    UserService::with_cost(SqliteUserRepository::new(conn), 4)
        .register(&RegisterInput {
            name: Some("Student".to_string()),
            email: Some(email.to_string()),
            password: Some("secret-pass".to_string()),
        })
        .unwrap()
        .id
}

fn seed_course_with_notes(conn: &Connection, user: UserId, notes: &[(&str, &str)]) -> Uuid {
    let academic = AcademicService::new(SqliteAcademicRepository::new(conn));
    let course = academic
        .create_course(
            user,
            &CourseInput {
                course_name: Some("Biology".to_string()),
                ..CourseInput::default()
            },
        )
        .unwrap();
    for (title, content) in notes {
        academic
            .create_note(
                user,
                &NoteInput {
                    title: Some(title.to_string()),
                    content: Some(content.to_string()),
                    course: Some(RefInput::Id(course.id.to_string())),
                },
            )
            .unwrap();
    }
    course.id
}

#[test]
fn prepare_combines_notes_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let course = seed_course_with_notes(
        &conn,
        user,
        &[("Cells", "Mitochondria"), ("Genetics", "DNA replication")],
    );
    let study = StudyService::new(SqliteAcademicRepository::new(&conn));

    let request = study
        .prepare(user, Some(&course.to_string()), Some("summarize"))
        .unwrap();

    assert_eq!(request.action, StudyAction::Summarize);
    assert_eq!(request.notes_processed, 2);
    assert!(!request.truncated);
    assert!(request.prompt.contains(
        "[Note 1] Genetics\n\nDNA replication\n\n---\n\n[Note 2] Cells\n\nMitochondria"
    ));
    assert!(request.prompt.starts_with("You are an expert academic assistant. Summarize"));
    assert!(request.prompt.ends_with("Please provide a comprehensive summary:"));
}

#[test]
fn each_action_uses_its_own_prompt() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let course = seed_course_with_notes(&conn, user, &[("Cells", "Mitochondria")]);
    let study = StudyService::new(SqliteAcademicRepository::new(&conn));
    let course = course.to_string();

    let quiz = study.prepare(user, Some(&course), Some("quiz")).unwrap();
    assert!(quiz.prompt.contains("5-question multiple-choice quiz"));

    let concepts = study
        .prepare(user, Some(&course), Some("key-concepts"))
        .unwrap();
    assert_eq!(concepts.action, StudyAction::KeyConcepts);
    assert!(concepts.prompt.contains("Extract and explain the key concepts"));

    let cards = study.prepare(user, Some(&course), Some("flashcards")).unwrap();
    assert!(cards.prompt.ends_with("Please generate the flashcards:"));
}

#[test]
fn missing_fields_and_unknown_action_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let study = StudyService::new(SqliteAcademicRepository::new(&conn));

    let err = study.prepare(user, None, Some("quiz")).unwrap_err();
    assert_eq!(err.to_string(), "Course ID and action are required.");

    let err = study
        .prepare(user, Some(&Uuid::new_v4().to_string()), Some("translate"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::Rejected(_))
    ));
    assert_eq!(
        err.to_string(),
        "Invalid action. Must be one of: summarize, key-concepts, quiz, flashcards"
    );
}

#[test]
fn course_without_visible_notes_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let ada = seed_user(&conn, "ada@example.com");
    let bob = seed_user(&conn, "bob@example.com");
    let course = seed_course_with_notes(&conn, ada, &[("Cells", "Mitochondria")]);
    let empty_course = seed_course_with_notes(&conn, ada, &[]);
    let study = StudyService::new(SqliteAcademicRepository::new(&conn));

    for (user, course_id) in [
        (bob, course.to_string()),
        (ada, empty_course.to_string()),
        (ada, "not-a-uuid".to_string()),
    ] {
        let err = study
            .prepare(user, Some(&course_id), Some("summarize"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound("No notes found for this course. Please create some notes first.")
        ));
    }
}

#[test]
fn oversized_notes_are_truncated() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let long_content = "x".repeat(MAX_NOTES_CHARS);
    let course = seed_course_with_notes(&conn, user, &[("Long", long_content.as_str())]);
    let study = StudyService::new(SqliteAcademicRepository::new(&conn));

    let request = study
        .prepare(user, Some(&course.to_string()), Some("summarize"))
        .unwrap();

    assert!(request.truncated);
    assert_eq!(request.notes_processed, 1);
    assert!(request.prompt.contains(TRUNCATION_MARKER));
}
