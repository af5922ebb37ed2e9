use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use super::error::{ApiError, ApiResult};
use crate::domain::{DomainError, Resource};
use crate::domain::access::Screen;
use crate::domain::records::PasswordReset;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::infrastructure::repositories::user_repository::hash_confirmed;

/// Admin reset of another account's password.
pub async fn reset_password(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<PasswordReset>,
) -> ApiResult<Json<Value>> {
    claims.require(Screen::Users)?;

    let password = payload.password.trim();
    if password.is_empty() {
        return Err(DomainError::invalid("password", "Password is required").into());
    }

    let hash = hash_confirmed(password, Some(payload.confirm_password.trim()))?;
    state
        .accounts()
        .set_password_hash(id, hash)
        .await
        .map_err(|e| ApiError::for_resource(Resource::Users, e))?;

    tracing::info!("{} reset the password of user {}", claims.sub, id);
    Ok(Json(json!({ "message": "Password updated" })))
}
