use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::Duration;
use orbit_core::open_db_in_memory;
use orbit_server::ai::{AiError, Generation, TextGenerator};
use orbit_server::auth::token::TokenKeys;
use orbit_server::routes;
use orbit_server::state::AppState;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// Generator that answers with a fixed reply and records prompts.
struct StubGenerator {
    reply: Result<Generation, AiError>,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(Generation {
                text: text.to_string(),
                model: "stub-model".to_string(),
            }),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(err: AiError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, AiError> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone()
    }
}

fn state(generator: Arc<StubGenerator>) -> web::Data<AppState> {
    let conn = open_db_in_memory().unwrap();
    let tokens = TokenKeys::new("test-secret", Duration::days(30));
    web::Data::new(AppState::new(conn, tokens, generator).with_bcrypt_cost(4))
}

macro_rules! init_app {
    ($generator:expr) => {
        test::init_service(
            App::new()
                .app_data(state($generator))
                .configure(routes::configure),
        )
        .await
    };
}

/// Registers a user and returns the issued token.
macro_rules! register {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "Student", "email": $email, "password": "secret-pass" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["token"].as_str().unwrap().to_string()
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn index_reports_running() {
    let app = init_app!(StubGenerator::answering("ok"));

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "Orbit Student Planner API is running...");
}

#[actix_web::test]
async fn register_login_and_me() {
    let app = init_app!(StubGenerator::answering("ok"));

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "Ada@Example.com", "password": "secret-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["email"], "ada@example.com");
    assert!(registered["_id"].is_string());
    assert!(registered["token"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "other-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User already exists");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "secret-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session: Value = test::read_body_json(resp).await;
    assert_eq!(session["_id"], registered["_id"]);
    let token = session["token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["name"], "Ada");
    assert!(me.get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[actix_web::test]
async fn protected_routes_require_a_valid_token() {
    let app = init_app!(StubGenerator::answering("ok"));

    let req = test::TestRequest::get().uri("/api/academic/courses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Not authorized, no token");

    let req = test::TestRequest::get()
        .uri("/api/planning/tasks")
        .insert_header(bearer("not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Not authorized, token failed");

    let foreign = TokenKeys::new("test-secret", Duration::days(1))
        .issue(uuid::Uuid::new_v4())
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/finance/accounts")
        .insert_header(bearer(&foreign))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn course_and_assignment_lifecycle() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/academic/courses")
        .insert_header(bearer(&token))
        .set_json(json!({
            "courseName": "Physics",
            "courseId": "PHY-101",
            "scheduleDays": ["Monday", "Wednesday"],
            "scheduleStartTime": "09:00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let course: Value = test::read_body_json(resp).await;
    let course_id = course["_id"].as_str().unwrap().to_string();
    assert_eq!(course["courseId"], "PHY-101");

    let req = test::TestRequest::post()
        .uri("/api/academic/assignments")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Lab report", "dueDate": "2025-03-01", "course": course_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let assignment: Value = test::read_body_json(resp).await;
    assert_eq!(assignment["status"], "To-Do");
    assert_eq!(assignment["course"]["courseName"], "Physics");

    let req = test::TestRequest::put()
        .uri(&format!(
            "/api/academic/assignments/{}",
            assignment["_id"].as_str().unwrap()
        ))
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "Done", "course": assignment["course"] }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "Done");
    assert_eq!(updated["title"], "Lab report");

    let req = test::TestRequest::put()
        .uri(&format!("/api/academic/courses/{course_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "instructor": "Dr. Meitner" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["instructor"], "Dr. Meitner");
    assert_eq!(updated["courseName"], "Physics");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/academic/courses/{course_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Course and associated assignments removed");

    let req = test::TestRequest::get()
        .uri("/api/academic/assignments")
        .insert_header(bearer(&token))
        .to_request();
    let assignments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(assignments, json!([]));
}

#[actix_web::test]
async fn bad_input_and_unknown_ids_map_to_client_errors() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/academic/courses")
        .insert_header(bearer(&token))
        .set_json(json!({ "instructor": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Course name is required");

    let req = test::TestRequest::post()
        .uri("/api/planning/tasks")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/academic/courses/64b7f0c2e4b0a1a2b3c4d5e6")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseName": "Ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Course not found");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/planning/goals/{}", uuid::Uuid::new_v4()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Goal not found");
}

#[actix_web::test]
async fn records_are_private_to_their_owner() {
    let app = init_app!(StubGenerator::answering("ok"));
    let ada = register!(app, "ada@example.com");
    let bob = register!(app, "bob@example.com");

    let req = test::TestRequest::post()
        .uri("/api/planning/tasks")
        .insert_header(bearer(&ada))
        .set_json(json!({ "title": "Read chapter 3", "dueDate": "2025-03-01" }))
        .to_request();
    let task: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task["isCompleted"], false);

    let req = test::TestRequest::get()
        .uri("/api/planning/tasks")
        .insert_header(bearer(&bob))
        .to_request();
    let tasks: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks, json!([]));

    let req = test::TestRequest::put()
        .uri(&format!("/api/planning/tasks/{}", task["_id"].as_str().unwrap()))
        .insert_header(bearer(&bob))
        .set_json(json!({ "isCompleted": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/api/planning/tasks/{}", task["_id"].as_str().unwrap()))
        .insert_header(bearer(&ada))
        .set_json(json!({ "isCompleted": true }))
        .to_request();
    let task: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task["isCompleted"], true);
}

#[actix_web::test]
async fn finance_transactions_update_balances_and_summary() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/finance/accounts")
        .insert_header(bearer(&token))
        .set_json(json!({ "accountName": "Checking", "balance": 100 }))
        .to_request();
    let account: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/finance/transactions")
        .insert_header(bearer(&token))
        .set_json(json!({
            "description": "Books",
            "amount": 40,
            "type": "Expense",
            "account": account["_id"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let transaction: Value = test::read_body_json(resp).await;
    assert_eq!(transaction["type"], "Expense");
    assert_eq!(transaction["account"]["accountName"], "Checking");

    let req = test::TestRequest::post()
        .uri("/api/finance/subscriptions")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Music", "monthlyCost": 9.5, "billingDate": 15 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/finance/summary")
        .insert_header(bearer(&token))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["totalBalance"], 60.0);
    assert_eq!(summary["totalMonthlySubscriptions"], 9.5);
    assert_eq!(summary["accountCount"], 1);
    assert_eq!(summary["subscriptionCount"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/finance/transactions/{}",
            transaction["_id"].as_str().unwrap()
        ))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Transaction removed");

    let req = test::TestRequest::get()
        .uri("/api/finance/accounts")
        .insert_header(bearer(&token))
        .to_request();
    let accounts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accounts[0]["balance"], 100.0);

    let req = test::TestRequest::post()
        .uri("/api/finance/transactions")
        .insert_header(bearer(&token))
        .set_json(json!({
            "description": "Phantom",
            "amount": 1,
            "type": "Income",
            "account": uuid::Uuid::new_v4().to_string()
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Associated account not found");
}

#[actix_web::test]
async fn process_notes_sends_prompt_to_generator() {
    let generator = StubGenerator::answering("  Cells make energy.\n");
    let app = init_app!(Arc::clone(&generator));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/academic/courses")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseName": "Biology" }))
        .to_request();
    let course: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/ai/process-notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseId": course["_id"], "action": "summarize" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "No notes found for this course. Please create some notes first."
    );

    let req = test::TestRequest::post()
        .uri("/api/academic/notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Cells", "content": "Mitochondria", "course": course["_id"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/ai/process-notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseId": course["_id"], "action": "summarize" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "summarize");
    assert_eq!(body["result"], "Cells make energy.");
    assert_eq!(body["notesProcessed"], 1);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

    let prompts = generator.prompts.lock();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[Note 1] Cells\n\nMitochondria"));
}

#[actix_web::test]
async fn process_notes_rejects_unknown_action() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/ai/process-notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseId": uuid::Uuid::new_v4().to_string(), "action": "poem" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Invalid action. Must be one of: summarize, key-concepts, quiz, flashcards"
    );
}

#[actix_web::test]
async fn unconfigured_generator_reports_unavailable() {
    let app = init_app!(StubGenerator::failing(AiError::NotConfigured));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/academic/courses")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseName": "Biology" }))
        .to_request();
    let course: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/academic/notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Cells", "course": course["_id"] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/ai/process-notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseId": course["_id"], "action": "quiz" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], AiError::NotConfigured.to_string());

    let req = test::TestRequest::get()
        .uri("/api/ai/status")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unavailable");
}

#[actix_web::test]
async fn status_reports_operational_model() {
    let app = init_app!(StubGenerator::answering("Hi"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::get()
        .uri("/api/ai/status")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "operational");
    assert_eq!(body["model"], "stub-model");
}

#[actix_web::test]
async fn note_lifecycle_within_a_course() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/academic/courses")
        .insert_header(bearer(&token))
        .set_json(json!({ "courseName": "Biology" }))
        .to_request();
    let course: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = course["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/academic/notes")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Cells", "content": "Mitochondria", "course": course_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let note: Value = test::read_body_json(resp).await;
    let note_id = note["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/academic/courses/{course_id}/notes"))
        .insert_header(bearer(&token))
        .to_request();
    let notes: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["title"], "Cells");

    let req = test::TestRequest::put()
        .uri(&format!("/api/academic/notes/{note_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "Mitochondria and ribosomes" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Cells");
    assert_eq!(updated["content"], "Mitochondria and ribosomes");

    let req = test::TestRequest::put()
        .uri(&format!("/api/academic/notes/{note_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/academic/notes/{note_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Note removed");

    let req = test::TestRequest::get()
        .uri(&format!("/api/academic/courses/{course_id}/notes"))
        .insert_header(bearer(&token))
        .to_request();
    let notes: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(notes, json!([]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/academic/notes/{note_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn goal_lifecycle() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/planning/goals")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Run a 10k" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let goal: Value = test::read_body_json(resp).await;
    assert_eq!(goal["category"], "Personal");
    assert_eq!(goal["status"], "Not Started");
    let goal_id = goal["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/planning/goals")
        .insert_header(bearer(&token))
        .set_json(json!({ "description": "untitled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Title is required");

    let req = test::TestRequest::put()
        .uri(&format!("/api/planning/goals/{goal_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "In Progress", "category": "Health" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "In Progress");
    assert_eq!(updated["category"], "Health");
    assert_eq!(updated["title"], "Run a 10k");

    let req = test::TestRequest::put()
        .uri(&format!("/api/planning/goals/{goal_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "Abandoned" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/planning/goals")
        .insert_header(bearer(&token))
        .to_request();
    let goals: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(goals.as_array().unwrap().len(), 1);
    assert_eq!(goals[0]["status"], "In Progress");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/planning/goals/{goal_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Goal removed");

    let req = test::TestRequest::get()
        .uri("/api/planning/goals")
        .insert_header(bearer(&token))
        .to_request();
    let goals: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(goals, json!([]));
}

#[actix_web::test]
async fn overflowing_transaction_is_a_bad_request() {
    let app = init_app!(StubGenerator::answering("ok"));
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/finance/accounts")
        .insert_header(bearer(&token))
        .set_json(json!({ "accountName": "Bank", "balance": 10.0 }))
        .to_request();
    let account: Value = test::call_and_read_body_json(&app, req).await;

    let transaction = json!({
        "description": "Windfall",
        "amount": 1e308,
        "type": "Income",
        "date": "2025-03-01",
        "account": account["_id"]
    });
    let req = test::TestRequest::post()
        .uri("/api/finance/transactions")
        .insert_header(bearer(&token))
        .set_json(&transaction)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/finance/transactions")
        .insert_header(bearer(&token))
        .set_json(&transaction)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/finance/accounts")
        .insert_header(bearer(&token))
        .to_request();
    let accounts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accounts[0]["balance"], json!(1e308));
}
