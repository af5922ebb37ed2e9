use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{ApiError, ApiResult};
use crate::domain::records::User;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{Claims, create_jwt, verify_password};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    token: String,
    role: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled or locked")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    tracing::info!("Login attempt for user: {}", payload.username);

    let Some(credentials) = state.accounts().find_credentials(&payload.username).await? else {
        tracing::warn!("User not found: {}", payload.username);
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &credentials.password_hash).unwrap_or(false) {
        tracing::warn!("Password verification failed for user: {}", payload.username);
        return Err(invalid_credentials());
    }

    let user = credentials.user;
    if !user.enabled {
        tracing::warn!("Disabled account tried to sign in: {}", user.username);
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }
    if !user.account_non_locked {
        tracing::warn!("Locked account tried to sign in: {}", user.username);
        return Err(ApiError::Forbidden("Account is locked".to_string()));
    }

    let token = create_jwt(&user.username, user.role).map_err(ApiError::Internal)?;
    tracing::info!("User {} signed in as {}", user.username, user.role);

    Ok(Json(LoginResponse {
        token,
        role: user.role.to_string(),
    }))
}

pub async fn me(State(state): State<AppState>, claims: Claims) -> ApiResult<Json<User>> {
    state
        .accounts()
        .find_credentials(&claims.sub)
        .await?
        .map(|c| Json(c.user))
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))
}
