use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::{NewUser, User, UserChanges};
use crate::error::AppError;

/// Persistence contract for user records.
///
/// The server only ever talks to this trait; the Postgres implementation
/// below is the production store and the integration tests substitute an
/// in-memory fake. Uniqueness of email and username is checked by callers
/// before insert/update, with the store's own constraints as backstop.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError>;
    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError>;
    /// Hard delete. Returns false if no row matched.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

const USER_COLUMNS: &str =
    "id, email, username, hashed_password, is_active, is_superuser, created_at, updated_at";

pub struct PgUserStore {
    pool: Arc<PgPool>,
}

impl PgUserStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, hashed_password, is_active, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.email)
        .bind(new_user.username)
        .bind(new_user.hashed_password)
        .bind(new_user.is_active)
        .bind(new_user.is_superuser)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                hashed_password = COALESCE($4, hashed_password),
                is_active = COALESCE($5, is_active),
                is_superuser = COALESCE($6, is_superuser),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.username)
        .bind(changes.hashed_password)
        .bind(changes.is_active)
        .bind(changes.is_superuser)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
