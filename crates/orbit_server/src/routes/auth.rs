use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse, Scope};
use orbit_core::model::user::{LoginInput, RegisterInput, User};
use orbit_core::{SqliteUserRepository, UserService};
use serde::Serialize;

pub fn routes() -> Scope {
    web::scope("/api/auth")
        .service(register)
        .service(login)
        .service(me)
}

#[derive(Serialize)]
struct SessionResponse {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    token: String,
}

impl SessionResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            token,
        }
    }
}

#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    let cost = state.bcrypt_cost;
    let user = state
        .with_conn(move |conn| {
            Ok(UserService::with_cost(SqliteUserRepository::new(conn), cost).register(&input)?)
        })
        .await?;

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|err| ApiError::internal(format!("cannot sign token: {err}")))?;
    Ok(HttpResponse::Created().json(SessionResponse::new(user, token)))
}

#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    let cost = state.bcrypt_cost;
    let user = state
        .with_conn(move |conn| {
            Ok(UserService::with_cost(SqliteUserRepository::new(conn), cost).authenticate(&input)?)
        })
        .await?;

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|err| ApiError::internal(format!("cannot sign token: {err}")))?;
    log::info!("event=user_login module=http status=ok user_id={}", user.id);
    Ok(HttpResponse::Ok().json(SessionResponse::new(user, token)))
}

#[get("/me")]
async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}
