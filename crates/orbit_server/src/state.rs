//! Shared application state.

use crate::ai::TextGenerator;
use crate::auth::token::TokenKeys;
use crate::error::ApiError;
use actix_web::web;
use orbit_core::service::user_service::DEFAULT_BCRYPT_COST;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;

/// State handed to every handler through `web::Data`.
///
/// SQLite access is serialized through one connection; handlers run their
/// storage work on the blocking pool via [`AppState::with_conn`].
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub tokens: TokenKeys,
    pub generator: Arc<dyn TextGenerator>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(conn: Connection, tokens: TokenKeys, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            tokens,
            generator,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Overrides the password hashing work factor (tests use the minimum).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Runs `work` with exclusive access to the connection off the async
    /// executor.
    pub async fn with_conn<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        web::block(move || {
            let mut conn = db.lock();
            work(&mut *conn)
        })
        .await?
    }
}
