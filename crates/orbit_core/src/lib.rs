//! Core domain logic for the Orbit student planner.
//! This crate is the single source of truth for business invariants;
//! transport layers only translate requests and responses.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LogTarget};
pub use model::{UserId, ValidationError};
pub use repo::academic_repo::{AcademicRepository, NoteOrder, SqliteAcademicRepository};
pub use repo::finance_repo::{FinanceRepository, SqliteFinanceRepository};
pub use repo::planning_repo::{PlanningRepository, SqlitePlanningRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::academic_service::AcademicService;
pub use service::finance_service::FinanceService;
pub use service::planning_service::PlanningService;
pub use service::study_service::{StudyAction, StudyRequest, StudyService};
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
