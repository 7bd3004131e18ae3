use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// The type claim baked into every token. Tagging the type inside the signed
/// payload means a refresh token can never be replayed as an access token
/// (or vice versa) without breaking the signature, using a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Issues and verifies signed, expiring access/refresh tokens. Built once
/// from settings at startup and never mutated.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = config
            .algorithm
            .parse::<Algorithm>()
            .map_err(|e| AppError::ConfigError(format!("invalid signing algorithm '{}': {}", config.algorithm, e)))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            algorithm,
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expire_days),
        })
    }

    pub fn issue_access(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Access, now + self.access_ttl)
    }

    pub fn issue_refresh(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Refresh, now + self.refresh_ttl)
    }

    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            token_type,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Verify a token and return its subject.
    ///
    /// Returns `None` if the signature does not check out, the token is
    /// expired relative to `now`, the subject claim is missing, or the type
    /// claim does not match `expected`. Malformed or tampered input is an
    /// invalid token, never an error; the caller decides the response.
    ///
    /// Expiry is checked against the caller-supplied clock rather than the
    /// system clock, which keeps validity windows deterministic under test.
    pub fn verify(&self, token: &str, expected: TokenType, now: DateTime<Utc>) -> Option<String> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        // A missing sub or type claim fails deserialization here
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .ok()?
            .claims;

        if claims.token_type != expected {
            return None;
        }
        if claims.exp <= now.timestamp() {
            return None;
        }

        Some(claims.sub)
    }
}
