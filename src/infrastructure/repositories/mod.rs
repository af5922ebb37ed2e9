//! Repository implementations using SeaORM

pub mod course_repository;
pub mod enrollment_repository;
pub mod instructor_repository;
pub mod interaction_repository;
pub mod payment_repository;
pub mod student_repository;
pub mod user_repository;

pub use course_repository::SeaOrmCourseRepository;
pub use enrollment_repository::SeaOrmEnrollmentRepository;
pub use instructor_repository::SeaOrmInstructorRepository;
pub use interaction_repository::SeaOrmInteractionRepository;
pub use payment_repository::SeaOrmPaymentRepository;
pub use student_repository::SeaOrmStudentRepository;
pub use user_repository::SeaOrmUserRepository;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::DomainError;
use crate::models::student;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

pub(crate) fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    value
        .map(|text| {
            NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
                DomainError::Internal(format!("Invalid stored date '{}': {}", text, e))
            })
        })
        .transpose()
}

pub(crate) fn parse_date_time(value: Option<&str>) -> Result<Option<NaiveDateTime>, DomainError> {
    value
        .map(|text| {
            NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).map_err(|e| {
                DomainError::Internal(format!("Invalid stored date-time '{}': {}", text, e))
            })
        })
        .transpose()
}

pub(crate) fn parse_amount(text: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(text)
        .map_err(|e| DomainError::Internal(format!("Invalid stored amount '{}': {}", text, e)))
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE '%term%'` with the wildcard characters of `term` escaped, so list
/// filters that run in SQL match the text literally.
pub(crate) fn contains_literal<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    Expr::col((column.entity_name(), column))
        .like(LikeExpr::new(like_pattern(term)).escape(LIKE_ESCAPE))
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match used by list filters that run in memory.
pub(crate) fn matches_filter(haystack: &str, filter: Option<&str>) -> bool {
    filter.is_none_or(|f| haystack.to_lowercase().contains(&f.to_lowercase()))
}

/// Full names of the given students, keyed by surrogate id.
pub(crate) async fn student_names<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DomainError> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let students = student::Entity::find()
        .filter(student::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(students
        .into_iter()
        .map(|s| (s.id, format!("{} {}", s.first_name, s.last_name)))
        .collect())
}
