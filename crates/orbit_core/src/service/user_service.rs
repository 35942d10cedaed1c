//! Registration and credential checks.
//!
//! # Invariants
//! - Stored emails are normalized before uniqueness checks.
//! - Unknown email and wrong password produce the same error.

use crate::model::user::{
    normalize_email, validate_email, validate_password, LoginInput, RegisterInput, User,
};
use crate::model::{now_utc, required_text, UserId, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::service::{ServiceError, ServiceResult};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// bcrypt work factor used unless a caller overrides it.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
    bcrypt_cost: u32,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using bcrypt's default work factor.
    pub fn new(repo: R) -> Self {
        Self::with_cost(repo, DEFAULT_BCRYPT_COST)
    }

    /// Creates a service with an explicit bcrypt work factor.
    pub fn with_cost(repo: R, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Registers a new user with a hashed password.
    pub fn register(&self, input: &RegisterInput) -> ServiceResult<User> {
        let name = required_text(input.name.as_deref());
        let email = required_text(input.email.as_deref());
        let password = input.password.as_deref().filter(|value| !value.is_empty());
        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(ValidationError::Required("Please add all fields").into());
        };

        let email = normalize_email(&email);
        validate_email(&email)?;
        validate_password(password)?;

        if self.repo.find_by_email(&email)?.is_some() {
            return Err(ServiceError::Conflict("User already exists"));
        }

        let password_hash = bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|err| ServiceError::PasswordHash(err.to_string()))?;
        let now = now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user_id = self.repo.create_user(&user).map_err(|err| match err {
            RepoError::Conflict(_) => ServiceError::Conflict("User already exists"),
            other => other.into(),
        })?;
        log::info!("event=user_register module=service status=ok user_id={user_id}");
        Ok(user)
    }

    /// Verifies credentials and returns the matching user.
    pub fn authenticate(&self, input: &LoginInput) -> ServiceResult<User> {
        let email = required_text(input.email.as_deref());
        let password = input.password.as_deref().filter(|value| !value.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(ValidationError::Required("Please provide email and password").into());
        };

        let Some(user) = self.repo.find_by_email(&normalize_email(&email))? else {
            log::warn!("event=user_login module=service status=rejected reason=unknown_email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS));
        };

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|err| ServiceError::PasswordHash(err.to_string()))?;
        if !matches {
            log::warn!(
                "event=user_login module=service status=rejected reason=bad_password user_id={}",
                user.id
            );
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Gets one user by id.
    pub fn get_user(&self, id: UserId) -> ServiceResult<Option<User>> {
        Ok(self.repo.get_user(id)?)
    }
}
