use actix_web::HttpRequest;
use chrono::Utc;

use crate::auth::token::TokenType;
use crate::db::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Pull the bearer credential out of the Authorization header.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authenticate the request and return the user behind the access token.
///
/// Absent credential rejects with 403 before any verification runs; a
/// credential that fails verification rejects with 401. The subject must
/// resolve to an existing, active user. Stateless per-call composition of
/// the token service and the user store.
pub async fn current_user(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(req).ok_or(AuthError::MissingCredentials)?;

    let subject = state
        .tokens
        .verify(token, TokenType::Access, Utc::now())
        .ok_or(AuthError::InvalidToken)?;

    let user_id: i32 = subject.parse().map_err(|_| AuthError::InvalidToken)?;

    // Deleted users are enforced here, not at token verification: a stale
    // token for a removed account dies on this lookup.
    let user = state
        .store
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }

    Ok(user)
}

/// Authenticate and additionally require superuser privilege.
pub async fn current_superuser(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let user = current_user(req, state).await?;

    if !user.is_superuser {
        return Err(AuthError::InsufficientPrivilege.into());
    }

    Ok(user)
}
