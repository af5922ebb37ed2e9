//! Generic CRUD endpoints shared by every screen.
//!
//! Each resource gets its own small router carrying the [`Resource`] as a
//! request extension, so one set of handlers serves all seven entities.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{ApiError, ApiResult};
use crate::domain::Resource;
use crate::domain::access::Screen;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

pub fn routes(resource: Resource) -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", resource.path()), get(list).post(create))
        .route(
            &format!("/{}/:id", resource.path()),
            get(fetch).put(update).delete(remove),
        )
        .layer(Extension(resource))
}

fn record_id(record: &Value) -> i64 {
    record.get("id").and_then(Value::as_i64).unwrap_or_default()
}

pub async fn list(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    claims: Claims,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    claims.require(Screen::from(resource))?;

    let records = state
        .screen(resource)
        .list(query.filter.as_deref())
        .await
        .map_err(|e| ApiError::for_resource(resource, e))?;

    Ok(Json(records))
}

pub async fn fetch(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    claims.require(Screen::from(resource))?;

    let record = state
        .screen(resource)
        .get(id)
        .await
        .map_err(|e| ApiError::for_resource(resource, e))?;

    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    claims: Claims,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    claims.require(Screen::from(resource))?;

    let record = state
        .screen(resource)
        .create(payload)
        .await
        .map_err(|e| ApiError::for_resource(resource, e))?;

    tracing::info!(
        "{} created {} {}",
        claims.sub,
        resource.singular(),
        record_id(&record)
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    claims.require(Screen::from(resource))?;

    let record = state
        .screen(resource)
        .update(id, payload)
        .await
        .map_err(|e| ApiError::for_resource(resource, e))?;

    tracing::info!("{} updated {} {}", claims.sub, resource.singular(), id);
    Ok(Json(record))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    claims.require(Screen::from(resource))?;

    state
        .screen(resource)
        .delete(id)
        .await
        .map_err(|e| ApiError::for_resource(resource, e))?;

    tracing::info!("{} deleted {} {}", claims.sub, resource.singular(), id);
    Ok(Json(json!({
        "message": format!("{} deleted", resource.singular())
    })))
}

/// Grid columns and form fields of one screen.
pub async fn describe(
    claims: Claims,
    Path(path): Path<String>,
) -> ApiResult<Json<Value>> {
    let resource = Resource::from_path(&path)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown screen: {}", path)))?;
    claims.require(Screen::from(resource))?;

    Ok(Json(resource.schema().describe()))
}
