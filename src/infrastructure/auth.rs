use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::env;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::api::error::ApiError;
use crate::domain::access::{self, Screen};
use crate::domain::enums::UserRole;
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub role: String,
    pub exp: usize,
}

impl Claims {
    /// The caller's role; unknown roles are treated as unauthenticated.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    /// Check the static access table for this caller.
    pub fn require(&self, screen: Screen) -> Result<UserRole, ApiError> {
        let Some(role) = self.user_role() else {
            return Err(ApiError::Unauthorized("Unknown role in token".to_string()));
        };

        if access::can_access(screen, role) {
            Ok(role)
        } else {
            tracing::warn!("{} ({}) denied access to {:?}", self.sub, role, screen);
            Err(ApiError::Forbidden(
                "You do not have access to this screen".to_string(),
            ))
        }
    }
}

/// Resolves the bearer token against the stored account on every request, so a
/// disabled, locked or re-roled user loses access before the token expires.
#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        };

        let mut claims = decode_jwt(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let Some(credentials) = state.accounts().find_credentials(&claims.sub).await? else {
            return Err(ApiError::Unauthorized("Account no longer exists".to_string()));
        };
        let user = credentials.user;
        if !user.enabled {
            tracing::warn!("Disabled account used a token: {}", user.username);
            return Err(ApiError::Forbidden("Account is disabled".to_string()));
        }
        if !user.account_non_locked {
            tracing::warn!("Locked account used a token: {}", user.username);
            return Err(ApiError::Forbidden("Account is locked".to_string()));
        }

        // The stored role wins over the one signed into the token.
        claims.role = user.role.as_str().to_owned();
        Ok(claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn get_jwt_secret() -> Result<String, String> {
    match env::var("JWT_SECRET") {
        Ok(secret) => Ok(secret),
        Err(_) if cfg!(debug_assertions) => Ok("secret".to_string()),
        Err(_) => Err("JWT_SECRET environment variable must be set in production".to_string()),
    }
}

pub fn create_jwt(username: &str, role: UserRole) -> Result<String, String> {
    let secret = get_jwt_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| "Token expiry out of range".to_string())?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        role: role.as_str().to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
