use crate::ai::AiError;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse, Scope};
use chrono::{SecondsFormat, Utc};
use orbit_core::{SqliteAcademicRepository, StudyService};
use serde::Deserialize;
use serde_json::json;

const STATUS_PROBE_PROMPT: &str = "Hello";

pub fn routes() -> Scope {
    web::scope("/api/ai")
        .service(process_notes)
        .service(status)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessNotesRequest {
    course_id: Option<String>,
    action: Option<String>,
}

#[post("/process-notes")]
async fn process_notes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ProcessNotesRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let ProcessNotesRequest { course_id, action } = body.into_inner();
    let request = state
        .with_conn(move |conn| {
            Ok(StudyService::new(SqliteAcademicRepository::new(conn)).prepare(
                user_id,
                course_id.as_deref(),
                action.as_deref(),
            )?)
        })
        .await?;

    log::info!(
        "event=ai_process module=http status=start action={} notes={} prompt_chars={} truncated={}",
        request.action.as_str(),
        request.notes_processed,
        request.prompt.chars().count(),
        request.truncated
    );
    let generation = state.generator.generate(&request.prompt).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "action": request.action.as_str(),
        "result": generation.text.trim(),
        "notesProcessed": request.notes_processed,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })))
}

#[get("/status")]
async fn status(state: web::Data<AppState>, _user: AuthenticatedUser) -> HttpResponse {
    match state.generator.generate(STATUS_PROBE_PROMPT).await {
        Ok(generation) => HttpResponse::Ok().json(json!({
            "status": "operational",
            "message": "AI service is ready",
            "model": generation.model,
        })),
        Err(AiError::NotConfigured) => HttpResponse::ServiceUnavailable().json(json!({
            "status": "unavailable",
            "message": "AI service is not configured",
        })),
        Err(err) => HttpResponse::ServiceUnavailable().json(json!({
            "status": "error",
            "message": "AI service is experiencing issues",
            "error": err.to_string(),
        })),
    }
}
