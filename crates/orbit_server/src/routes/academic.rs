use super::{message, parse_path_id};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use orbit_core::model::academic::{AssignmentInput, CourseInput, NoteInput};
use orbit_core::{AcademicService, SqliteAcademicRepository};
use rusqlite::Connection;

pub fn routes() -> Scope {
    web::scope("/api/academic")
        .service(list_courses)
        .service(create_course)
        .service(update_course)
        .service(delete_course)
        .service(list_course_notes)
        .service(list_assignments)
        .service(create_assignment)
        .service(update_assignment)
        .service(delete_assignment)
        .service(create_note)
        .service(update_note)
        .service(delete_note)
}

fn service(conn: &Connection) -> AcademicService<SqliteAcademicRepository<'_>> {
    AcademicService::new(SqliteAcademicRepository::new(conn))
}

#[get("/courses")]
async fn list_courses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let courses = state
        .with_conn(move |conn| Ok(service(conn).list_courses(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[post("/courses")]
async fn create_course(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CourseInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let course = state
        .with_conn(move |conn| Ok(service(conn).create_course(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(course))
}

#[put("/courses/{id}")]
async fn update_course(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<CourseInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Course not found")?;
    let input = body.into_inner();
    let course = state
        .with_conn(move |conn| Ok(service(conn).update_course(user_id, id, &input)?))
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[delete("/courses/{id}")]
async fn delete_course(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Course not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_course(user_id, id)?))
        .await?;
    Ok(message("Course and associated assignments removed"))
}

#[get("/courses/{course_id}/notes")]
async fn list_course_notes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let course_id = parse_path_id(&path, "Course not found")?;
    let notes = state
        .with_conn(move |conn| Ok(service(conn).list_notes(user_id, course_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(notes))
}

#[get("/assignments")]
async fn list_assignments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let assignments = state
        .with_conn(move |conn| Ok(service(conn).list_assignments(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(assignments))
}

#[post("/assignments")]
async fn create_assignment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<AssignmentInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let assignment = state
        .with_conn(move |conn| Ok(service(conn).create_assignment(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

#[put("/assignments/{id}")]
async fn update_assignment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<AssignmentInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Assignment not found")?;
    let input = body.into_inner();
    let assignment = state
        .with_conn(move |conn| Ok(service(conn).update_assignment(user_id, id, &input)?))
        .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[delete("/assignments/{id}")]
async fn delete_assignment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Assignment not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_assignment(user_id, id)?))
        .await?;
    Ok(message("Assignment removed successfully"))
}

#[post("/notes")]
async fn create_note(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<NoteInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let note = state
        .with_conn(move |conn| Ok(service(conn).create_note(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(note))
}

#[put("/notes/{note_id}")]
async fn update_note(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<NoteInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Note not found")?;
    let input = body.into_inner();
    let note = state
        .with_conn(move |conn| Ok(service(conn).update_note(user_id, id, &input)?))
        .await?;
    Ok(HttpResponse::Ok().json(note))
}

#[delete("/notes/{note_id}")]
async fn delete_note(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Note not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_note(user_id, id)?))
        .await?;
    Ok(message("Note removed"))
}
