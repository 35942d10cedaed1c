//! HTTP routes.

pub mod academic;
pub mod ai;
pub mod auth;
pub mod finance;
pub mod planning;

use crate::error::ApiError;
use actix_web::{get, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

/// Registers every route plus the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid request body: {err}")).into()
    }))
    .service(index)
    .service(auth::routes())
    .service(academic::routes())
    .service(planning::routes())
    .service(finance::routes())
    .service(ai::routes());
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Orbit Student Planner API is running...")
}

/// Parses a path id; malformed ids are indistinguishable from missing rows.
pub(crate) fn parse_path_id(raw: &str, not_found: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(not_found))
}

pub(crate) fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": text }))
}
