use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use userbase_server::db::{NewUser, User, UserChanges, UserStore};
use userbase_server::error::{AppError, DatabaseError};
use userbase_server::{AppState, Settings};

/// In-memory user store standing in for Postgres. Same contract as the
/// production store, including the duplicate backstop on insert/update.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i32, User>,
    next_id: i32,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == new_user.email || u.username == new_user.username) {
            return Err(AppError::DatabaseError(DatabaseError::Duplicate));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            email: new_user.email,
            username: new_user.username,
            hashed_password: new_user.hashed_password,
            is_active: new_user.is_active,
            is_superuser: new_user.is_superuser,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users.into_iter().skip(skip as usize).take(limit as usize).collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = &changes.email {
            if inner.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::DatabaseError(DatabaseError::Duplicate));
            }
        }
        if let Some(username) = &changes.username {
            if inner.users.values().any(|u| u.id != id && &u.username == username) {
                return Err(AppError::DatabaseError(DatabaseError::Duplicate));
            }
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(hashed_password) = changes.hashed_password {
            user.hashed_password = hashed_password;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(is_superuser) = changes.is_superuser {
            user.is_superuser = is_superuser;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }
}

/// App state over the in-memory store with the test settings (low bcrypt
/// cost, fixed signing secret).
pub fn test_state() -> AppState {
    let config = Settings::new_for_test().expect("Failed to load test config");
    AppState::with_store(config, Arc::new(MemoryStore::default()))
        .expect("Failed to build test state")
}
