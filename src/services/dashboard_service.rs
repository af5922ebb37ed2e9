//! Dashboard Service - headline figures for the landing screen
//!
//! Counts come straight from the database; money is summed as exact
//! decimals and formatted the same way as in student reports.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::domain::enums::{EnrollmentStatus, PaymentStatus, StudentStatus};
use crate::domain::records::{Enrollment, Interaction, Payment};
use crate::infrastructure::repositories::{
    enrollment_repository, interaction_repository, parse_amount, payment_repository,
    student_names,
};
use crate::models::{course, enrollment, interaction, payment, student};
use crate::report::format;

const RECENT_LIMIT: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentTotal {
    pub status: String,
    pub count: u64,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub active_students: u64,
    pub total_courses: u64,
    pub active_enrollments: u64,
    pub pending_amount: String,
    pub enrollments_by_status: Vec<StatusCount>,
    pub payments_by_status: Vec<PaymentTotal>,
    pub recent_enrollments: Vec<Enrollment>,
    pub recent_payments: Vec<Payment>,
    pub recent_interactions: Vec<Interaction>,
}

/// Group stored payments by status and sum their amounts exactly.
fn payment_totals(payments: &[payment::Model]) -> Result<Vec<PaymentTotal>, DomainError> {
    let mut grouped: HashMap<&str, (u64, Decimal)> = HashMap::new();
    for p in payments {
        if let Some(status) = p.status.as_deref() {
            let entry = grouped.entry(status).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += parse_amount(&p.amount)?;
        }
    }

    Ok(PaymentStatus::ALL
        .iter()
        .map(|status| {
            let (count, total) = grouped
                .get(status.as_str())
                .copied()
                .unwrap_or((0, Decimal::ZERO));
            PaymentTotal {
                status: status.as_str().to_string(),
                count,
                total: format::amount(total),
            }
        })
        .collect())
}

pub async fn summary(db: &DatabaseConnection) -> Result<DashboardSummary, DomainError> {
    let active_students = student::Entity::find()
        .filter(student::Column::Status.eq(StudentStatus::Active.as_str()))
        .count(db)
        .await?;
    let total_courses = course::Entity::find().count(db).await?;

    let mut enrollments_by_status = Vec::with_capacity(EnrollmentStatus::ALL.len());
    for status in EnrollmentStatus::ALL {
        let count = enrollment::Entity::find()
            .filter(enrollment::Column::Status.eq(status.as_str()))
            .count(db)
            .await?;
        enrollments_by_status.push(StatusCount {
            status: status.as_str().to_string(),
            count,
        });
    }
    let active_enrollments = enrollments_by_status
        .iter()
        .find(|s| s.status == EnrollmentStatus::Enrolled.as_str())
        .map_or(0, |s| s.count);

    let all_payments = payment::Entity::find().all(db).await?;
    let payments_by_status = payment_totals(&all_payments)?;
    let pending_amount = payments_by_status
        .iter()
        .find(|p| p.status == PaymentStatus::Pending.as_str())
        .map(|p| p.total.clone())
        .unwrap_or_else(|| format::amount(Decimal::ZERO));

    let recent_enrollments = recent_enrollments(db).await?;
    let recent_payments = recent_payments(db).await?;
    let recent_interactions = recent_interactions(db).await?;

    tracing::debug!(
        "Dashboard: {} active students, {} courses, {} active enrollments",
        active_students,
        total_courses,
        active_enrollments
    );

    Ok(DashboardSummary {
        active_students,
        total_courses,
        active_enrollments,
        pending_amount,
        enrollments_by_status,
        payments_by_status,
        recent_enrollments,
        recent_payments,
        recent_interactions,
    })
}

async fn recent_enrollments(db: &DatabaseConnection) -> Result<Vec<Enrollment>, DomainError> {
    let rows = enrollment::Entity::find()
        .find_also_related(course::Entity)
        .order_by_desc(enrollment::Column::EnrollmentDate)
        .order_by_desc(enrollment::Column::Id)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?;

    let names = student_names(db, rows.iter().map(|(e, _)| e.student_id)).await?;
    rows.into_iter()
        .map(|(e, c)| {
            let name = names.get(&e.student_id).cloned().unwrap_or_default();
            enrollment_repository::to_record(e, c, name)
        })
        .collect()
}

async fn recent_payments(db: &DatabaseConnection) -> Result<Vec<Payment>, DomainError> {
    let rows = payment::Entity::find()
        .filter(payment::Column::PaymentDate.is_not_null())
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?;

    let names = student_names(db, rows.iter().map(|p| p.student_id)).await?;
    rows.into_iter()
        .map(|p| {
            let name = names.get(&p.student_id).cloned().unwrap_or_default();
            payment_repository::to_record(p, name)
        })
        .collect()
}

async fn recent_interactions(db: &DatabaseConnection) -> Result<Vec<Interaction>, DomainError> {
    let rows = interaction::Entity::find()
        .order_by_desc(interaction::Column::InteractionDate)
        .order_by_desc(interaction::Column::Id)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?;

    let names = student_names(db, rows.iter().map(|i| i.student_id)).await?;
    rows.into_iter()
        .map(|i| {
            let name = names.get(&i.student_id).cloned().unwrap_or_default();
            interaction_repository::to_record(i, name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(status: &str, amount: &str) -> payment::Model {
        payment::Model {
            id: 1,
            student_id: 1,
            amount: amount.to_string(),
            payment_date: None,
            due_date: None,
            status: Some(status.to_string()),
            method: None,
            transaction_id: None,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn totals_are_exact_and_cover_every_status() {
        let payments = [
            stored("PENDING", "0.10"),
            stored("PENDING", "0.20"),
            stored("PAID", "1500.00"),
        ];

        let totals = payment_totals(&payments).unwrap();
        assert_eq!(totals.len(), PaymentStatus::ALL.len());

        let pending = totals.iter().find(|t| t.status == "PENDING").unwrap();
        assert_eq!(pending.count, 2);
        assert_eq!(pending.total, "Rs. 0.30");

        let refunded = totals.iter().find(|t| t.status == "REFUNDED").unwrap();
        assert_eq!(refunded.count, 0);
        assert_eq!(refunded.total, "Rs. 0");
    }
}
