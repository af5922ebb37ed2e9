use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use crate::domain::access::Screen;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/report",
    params(
        ("id" = i32, Path, description = "Student id"),
        ("format" = Option<String>, Query, description = "pdf (default) or json")
    ),
    responses(
        (status = 200, description = "Student report", content_type = "application/pdf"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Report could not be generated")
    )
)]
pub async fn student_report(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Response> {
    claims.require(Screen::Students)?;
    tracing::info!("{} requested the report of student {}", claims.sub, id);

    match query.format.as_deref() {
        Some("json") => Ok(Json(state.reports.document(id).await?).into_response()),
        None | Some("pdf") => {
            let report = state.reports.pdf(id).await?;
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", report.file_name),
                ),
            ];
            Ok((headers, report.bytes).into_response())
        }
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unsupported report format: {}",
            other
        ))),
    }
}
