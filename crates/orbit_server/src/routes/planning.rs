use super::{message, parse_path_id};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use orbit_core::model::planning::{GoalInput, TaskInput};
use orbit_core::{PlanningService, SqlitePlanningRepository};
use rusqlite::Connection;

pub fn routes() -> Scope {
    web::scope("/api/planning")
        .service(list_tasks)
        .service(create_task)
        .service(update_task)
        .service(delete_task)
        .service(list_goals)
        .service(create_goal)
        .service(update_goal)
        .service(delete_goal)
}

fn service(conn: &Connection) -> PlanningService<SqlitePlanningRepository<'_>> {
    PlanningService::new(SqlitePlanningRepository::new(conn))
}

#[get("/tasks")]
async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let tasks = state
        .with_conn(move |conn| Ok(service(conn).list_tasks(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks")]
async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<TaskInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let task = state
        .with_conn(move |conn| Ok(service(conn).create_task(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(task))
}

#[put("/tasks/{id}")]
async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<TaskInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Task not found")?;
    let input = body.into_inner();
    let task = state
        .with_conn(move |conn| Ok(service(conn).update_task(user_id, id, &input)?))
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/tasks/{id}")]
async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Task not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_task(user_id, id)?))
        .await?;
    Ok(message("Task removed"))
}

#[get("/goals")]
async fn list_goals(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let goals = state
        .with_conn(move |conn| Ok(service(conn).list_goals(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(goals))
}

#[post("/goals")]
async fn create_goal(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<GoalInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let goal = state
        .with_conn(move |conn| Ok(service(conn).create_goal(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(goal))
}

#[put("/goals/{id}")]
async fn update_goal(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<GoalInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Goal not found")?;
    let input = body.into_inner();
    let goal = state
        .with_conn(move |conn| Ok(service(conn).update_goal(user_id, id, &input)?))
        .await?;
    Ok(HttpResponse::Ok().json(goal))
}

#[delete("/goals/{id}")]
async fn delete_goal(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Goal not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_goal(user_id, id)?))
        .await?;
    Ok(message("Goal removed"))
}
