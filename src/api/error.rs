use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::{DomainError, FieldError, Resource};
use crate::report::ReportError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Domain error raised while working on one screen, so "not found" can
    /// name the entity.
    pub fn for_resource(resource: Resource, err: DomainError) -> Self {
        match err {
            DomainError::NotFound => {
                ApiError::NotFound(format!("{} not found", resource.singular()))
            }
            other => other.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ApiError::NotFound(err.to_string()),
            DomainError::Invalid(fields) => ApiError::Validation(fields),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("{}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound => ApiError::NotFound(err.to_string()),
            ReportError::GenerationFailure(cause) => {
                tracing::error!("Report generation failed: {}", cause);
                ApiError::Internal(format!("Error generating report: {}", cause))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_errors_keep_their_messages() {
        let missing: ApiError = ReportError::NotFound.into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Student not found");

        let failed: ApiError = ReportError::GenerationFailure("bad amount".to_string()).into();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.to_string(), "Error generating report: bad amount");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = ApiError::for_resource(Resource::Courses, DomainError::NotFound);
        assert_eq!(err.to_string(), "Course not found");

        let conflict = ApiError::for_resource(
            Resource::Students,
            DomainError::Conflict("A record with this email already exists".to_string()),
        );
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }
}
