use bcrypt::{hash, verify};

use crate::error::AppError;

/// Hash a password with bcrypt.
///
/// bcrypt salts internally, so the same password yields a different digest
/// on every call while still verifying against the original input. The work
/// is CPU-bound and runs on the blocking thread pool to keep async workers
/// free.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| AppError::InternalError(e.to_string()))
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?
}

/// Verify a password against a stored digest.
///
/// Returns false on mismatch and on a malformed digest; a bad digest is a
/// non-match, never an error surfaced to the caller.
pub async fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let digest = digest.to_string();

    tokio::task::spawn_blocking(move || verify(password, &digest).unwrap_or(false))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Validate a candidate password before hashing: 8 to 72 bytes. bcrypt
/// ignores input beyond 72 bytes, so anything longer would silently verify
/// against any password sharing its 72-byte prefix.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::ValidationError(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if password.len() > 72 {
        return Err(AppError::ValidationError(
            "Password must be at most 72 characters".to_string(),
        ));
    }
    Ok(())
}
