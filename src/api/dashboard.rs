use axum::{Json, extract::State};
use sea_orm::DatabaseConnection;

use super::error::ApiResult;
use crate::domain::access::Screen;
use crate::infrastructure::auth::Claims;
use crate::services::dashboard_service::{self, DashboardSummary};

pub async fn dashboard(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> ApiResult<Json<DashboardSummary>> {
    claims.require(Screen::Dashboard)?;
    Ok(Json(dashboard_service::summary(&db).await?))
}
