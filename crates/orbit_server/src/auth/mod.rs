//! Bearer-token authentication.
//!
//! # Invariants
//! - Missing or malformed `Authorization` headers answer
//!   `Not authorized, no token`.
//! - Bad signatures, expired tokens and tokens of deleted users answer
//!   `Not authorized, token failed`.

pub mod token;

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use orbit_core::model::user::User;
use orbit_core::{SqliteUserRepository, UserId, UserRepository};
use std::future::Future;
use std::pin::Pin;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

const BEARER_PREFIX: &str = "Bearer ";

/// The user behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| ApiError::internal("application state is not registered"))?;
            let token = token.ok_or(ApiError::Unauthorized(NO_TOKEN))?;
            let Some(user_id) = state.tokens.verify(&token) else {
                log::warn!("event=auth_verify module=http status=rejected reason=invalid_token");
                return Err(ApiError::Unauthorized(TOKEN_FAILED));
            };

            let user = state
                .with_conn(move |conn| Ok(SqliteUserRepository::new(conn).get_user(user_id)?))
                .await?;
            match user {
                Some(user) => Ok(Self(user)),
                None => {
                    log::warn!(
                        "event=auth_verify module=http status=rejected reason=unknown_user user_id={user_id}"
                    );
                    Err(ApiError::Unauthorized(TOKEN_FAILED))
                }
            }
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
