use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::env;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use maternal_care_data::models::User;

use crate::auth::Claims;

/// Security errors for authentication and token operations
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    /// Expired token
    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Configuration error
    #[error("Security configuration error: {0}")]
    ConfigError(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Secret used when no `JWT_SECRET` is set in a debug build
const DEV_SECRET: &str = "maternal-care-development-secret";

pub const DEFAULT_ISSUER: &str = "MaternalCare-api";

/// Access tokens live for an hour unless configured otherwise
pub const DEFAULT_ACCESS_MINUTES: i64 = 60;

/// Signing settings for access tokens
#[derive(Debug, Clone)]
pub struct TokenSettings {
    secret: String,
    pub issuer: String,
    pub access_minutes: i64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, access_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            access_minutes,
        }
    }

    /// Read `JWT_SECRET`, `JWT_ISSUER` and `ACCESS_TOKEN_EXPIRATION_MINUTES`
    ///
    /// Release builds refuse to start without a secret.
    pub fn from_env() -> Result<Self, SecurityError> {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_SECRET.to_string()
            }
            _ => {
                error!("JWT_SECRET environment variable not found");
                return Err(SecurityError::ConfigError(
                    "JWT_SECRET environment variable not found".to_string(),
                ));
            }
        };

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());
        let access_minutes = env::var("ACCESS_TOKEN_EXPIRATION_MINUTES")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_ACCESS_MINUTES);

        Ok(Self::new(secret, issuer, access_minutes))
    }

    /// Lifetime of an access token in seconds
    pub fn expires_in(&self) -> i64 {
        self.access_minutes * 60
    }

    /// Generate an access token carrying the account's role
    pub fn generate_token(&self, user: &User) -> Result<String, SecurityError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.access_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            error!("Failed to encode JWT token: {}", e);
            SecurityError::TokenValidation(e.to_string())
        })?;

        // Never log the token itself
        info!("Generated access token for user {}", user.id);
        debug!("Token expiration: {}", expiration);

        Ok(token)
    }

    /// Validate a JWT token and return the decoded claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, SecurityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => SecurityError::InvalidToken,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => SecurityError::InvalidIssuer,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                SecurityError::TokenValidation("Invalid signature".to_string())
            }
            _ => SecurityError::TokenValidation(e.to_string()),
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maternal_care_data::models::Role;
    use uuid::Uuid;

    fn settings() -> TokenSettings {
        TokenSettings::new("test_secret_key_for_testing_only", "test-issuer", 15)
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "midwife@example.org".to_string(),
            full_name: "Rosa Reyes".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let settings = settings();
        let user = user(Role::Admin);

        let token = settings.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = settings.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(settings.expires_in(), 900);
    }

    #[test]
    fn test_token_expiration() {
        let settings = settings();
        let claims = Claims {
            sub: "test-user-456".to_string(),
            email: "old@example.org".to_string(),
            role: Role::Worker,
            iss: "test-issuer".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_only".as_bytes()),
        )
        .unwrap();

        match settings.validate_token(&token) {
            Err(SecurityError::TokenExpired) => {}
            other => panic!("Expected TokenExpired error but got: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_issuer_or_secret_is_rejected() {
        let token = settings().generate_token(&user(Role::Worker)).unwrap();

        let other_issuer = TokenSettings::new("test_secret_key_for_testing_only", "someone-else", 15);
        assert!(matches!(other_issuer.validate_token(&token), Err(SecurityError::InvalidIssuer)));

        let other_secret = TokenSettings::new("a-different-secret", "test-issuer", 15);
        assert!(other_secret.validate_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let result = settings().validate_token("invalid.token.format");
        assert!(matches!(
            result,
            Err(SecurityError::InvalidToken) | Err(SecurityError::TokenValidation(_))
        ));
    }
}
