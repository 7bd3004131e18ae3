use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::password::verify_password;
use crate::auth::token::{TokenService, TokenType};
use crate::db::{User, UserStore};
use crate::error::{AppError, AuthError};

/// One access token plus one refresh token, as returned by login and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Check an email/password pair against the store.
    ///
    /// Unknown email and wrong password fail identically, so the response
    /// never reveals which half of the pair was wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match self.store.get_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        if !verify_password(password, &user.hashed_password).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let user = self.authenticate(email, password).await?;

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        let pair = self.issue_pair(user.id)?;
        info!("Issued token pair for user {}", user.id);

        Ok((user, pair))
    }

    /// Exchange a refresh token for a fresh access/refresh pair.
    ///
    /// Both tokens are newly minted; the presented refresh token is not
    /// invalidated and remains usable until it expires on its own.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let now = Utc::now();

        let subject = self
            .tokens
            .verify(refresh_token, TokenType::Refresh, now)
            .ok_or(AuthError::InvalidToken)?;

        let user_id: i32 = subject.parse().map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .store
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        let pair = self.issue_pair(user.id)?;
        info!("Rotated token pair for user {}", user.id);

        Ok(pair)
    }

    fn issue_pair(&self, user_id: i32) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let subject = user_id.to_string();

        Ok(TokenPair {
            access_token: self.tokens.issue_access(&subject, now)?,
            refresh_token: self.tokens.issue_refresh(&subject, now)?,
        })
    }
}
