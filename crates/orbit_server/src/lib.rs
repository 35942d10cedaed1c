//! HTTP surface of the Orbit student planner.
//!
//! # Responsibility
//! - Translate JSON requests into `orbit_core` service calls.
//! - Authenticate callers with bearer tokens.
//! - Bridge study prompts to the configured text generator.
//!
//! # Invariants
//! - Handlers never hold the SQLite connection across an `.await`.
//! - Storage work runs on the blocking pool, never on the async executor.

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use crate::ai::gemini::GeminiClient;
use crate::ai::AiError;
use crate::auth::token::TokenKeys;
use crate::config::ServerConfig;
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use orbit_core::{init_logging, open_db, DbError};
use std::sync::Arc;
use thiserror::Error;

/// Failure before the server starts accepting requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("database setup failed: {0}")]
    Database(#[from] DbError),
    #[error("AI client setup failed: {0}")]
    Ai(#[from] AiError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// CORS policy: any origin, since the web client is served separately.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Builds application state from configuration.
pub fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    config.validate().map_err(StartupError::Config)?;

    let conn = open_db(&config.database)?;
    let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl());
    let api_key = config.gemini_key();
    if api_key.is_none() {
        log::warn!("event=ai_config module=startup status=disabled reason=missing_api_key");
    }
    let generator = GeminiClient::new(api_key, config.gemini_base_url.as_str())?;

    Ok(AppState::new(conn, tokens, Arc::new(generator)))
}

/// Initializes logging and storage, then serves until shutdown.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    init_logging(&config.log_settings()).map_err(StartupError::Logging)?;

    let state = web::Data::new(build_state(&config)?);
    log::info!(
        "event=server_start module=startup status=ok host={} port={} database={} core_version={}",
        config.host,
        config.port,
        config.database.display(),
        orbit_core::core_version()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("event=server_stop module=startup status=ok");
    Ok(())
}
