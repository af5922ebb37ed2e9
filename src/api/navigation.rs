use axum::Json;
use serde_json::{Value, json};

use super::error::{ApiError, ApiResult};
use crate::domain::access;
use crate::infrastructure::auth::Claims;

/// Menu entries the caller may open, in menu order.
pub async fn navigation(claims: Claims) -> ApiResult<Json<Value>> {
    let role = claims
        .user_role()
        .ok_or_else(|| ApiError::Unauthorized("Unknown role in token".to_string()))?;

    let items: Vec<Value> = access::visible_screens(role)
        .into_iter()
        .map(|entry| {
            json!({
                "screen": entry.screen,
                "label": entry.label,
                "route": entry.route,
            })
        })
        .collect();

    Ok(Json(json!({
        "username": claims.sub,
        "role": role,
        "items": items,
    })))
}
