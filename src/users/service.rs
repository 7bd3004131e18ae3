use std::sync::Arc;

use tracing::info;

use crate::auth::password::{hash_password, validate_password};
use crate::db::{NewUser, User, UserChanges, UserStore};
use crate::error::AppError;
use crate::users::handlers::{CreateUserRequest, UpdateUserRequest};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AppError::ValidationError(format!("'{}' is not a valid email address", email)));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if len < USERNAME_MIN || len > USERNAME_MAX {
        return Err(AppError::ValidationError(format!(
            "Username must be {} to {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    Ok(())
}

/// CRUD over the user store with field validation, uniqueness pre-checks,
/// and password hashing. Holds no state beyond the injected store handle.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    pub async fn get(&self, id: i32) -> Result<User, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        self.store.list(skip, limit).await
    }

    pub async fn register(&self, req: CreateUserRequest) -> Result<User, AppError> {
        validate_email(&req.email)?;
        validate_username(&req.username)?;
        validate_password(&req.password)?;

        // Uniqueness is checked before mutation; the store's unique
        // constraints are the backstop against a concurrent insert.
        if self.store.get_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if self.store.get_by_username(&req.username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let hashed_password = hash_password(&req.password, self.bcrypt_cost).await?;

        let user = self
            .store
            .insert(NewUser {
                email: req.email,
                username: req.username,
                hashed_password,
                is_active: req.is_active,
                is_superuser: req.is_superuser,
            })
            .await?;

        info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Partial update. Only supplied fields change; duplicate checks run
    /// only when the value actually differs from the stored one.
    pub async fn update(&self, id: i32, req: UpdateUserRequest) -> Result<User, AppError> {
        let current = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut changes = UserChanges::default();

        if let Some(email) = req.email {
            validate_email(&email)?;
            if email != current.email && self.store.get_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            changes.email = Some(email);
        }

        if let Some(username) = req.username {
            validate_username(&username)?;
            if username != current.username
                && self.store.get_by_username(&username).await?.is_some()
            {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
            changes.username = Some(username);
        }

        if let Some(password) = req.password {
            validate_password(&password)?;
            changes.hashed_password = Some(hash_password(&password, self.bcrypt_cost).await?);
        }

        changes.is_active = req.is_active;
        changes.is_superuser = req.is_superuser;

        self.store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        info!("Deleted user {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@nodot").is_err());
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
        assert!(validate_username(&"x".repeat(50)).is_ok());
    }
}
