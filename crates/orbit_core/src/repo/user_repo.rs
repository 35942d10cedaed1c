//! User repository contracts and SQLite implementation.

use crate::model::user::User;
use crate::model::UserId;
use crate::repo::{from_millis, is_unique_violation, parse_id, to_millis, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    password_hash,
    created_at,
    updated_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a user; duplicate emails yield `RepoError::Conflict`.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Looks up by normalized (lowercase) email.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let result = self.conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                user.id.to_string(),
                user.name.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                to_millis(user.created_at),
                to_millis(user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(user.id),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict("users.email")),
            Err(err) => Err(err.into()),
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id.to_string()], |row| Ok(read_user_row(row)))
            .optional()?;
        row.transpose()
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let row = stmt
            .query_row([email], |row| Ok(read_user_row(row)))
            .optional()?;
        row.transpose()
    }
}

fn read_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_id("users.id", &id_text)?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: from_millis("users.created_at", row.get("created_at")?)?,
        updated_at: from_millis("users.updated_at", row.get("updated_at")?)?,
    })
}
