//! SeaORM implementation of the payment store
//!
//! Amounts are kept as exact decimal text and only converted at this edge.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{format_date, matches_filter, now, parse_amount, parse_date, student_names};
use crate::domain::enums::parse_optional;
use crate::domain::records::{Payment, PaymentForm};
use crate::domain::{DomainError, EntityStore, Resource};
use crate::models::payment::{self, ActiveModel, Entity as PaymentEntity};

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_name(&self, model: payment::Model) -> Result<Payment, DomainError> {
        let names = student_names(&self.db, [model.student_id]).await?;
        let name = names.get(&model.student_id).cloned().unwrap_or_default();
        to_record(model, name)
    }
}

pub(crate) fn to_record(
    model: payment::Model,
    student_name: String,
) -> Result<Payment, DomainError> {
    Ok(Payment {
        id: model.id,
        student_id: model.student_id,
        student_name,
        amount: parse_amount(&model.amount)?,
        payment_date: parse_date(model.payment_date.as_deref())?,
        due_date: parse_date(model.due_date.as_deref())?,
        status: parse_optional(model.status.as_deref())?,
        method: parse_optional(model.method.as_deref())?,
        transaction_id: model.transaction_id,
        notes: model.notes,
    })
}

fn apply_form(active: &mut ActiveModel, form: PaymentForm) {
    active.student_id = Set(form.student_id);
    active.amount = Set(form.amount.to_string());
    active.payment_date = Set(form.payment_date.map(format_date));
    active.due_date = Set(Some(format_date(form.due_date)));
    active.status = Set(Some(form.status.as_str().to_owned()));
    active.method = Set(form.method.map(|m| m.as_str().to_owned()));
    active.transaction_id = Set(form.transaction_id);
    active.notes = Set(form.notes);
}

#[async_trait]
impl EntityStore for SeaOrmPaymentRepository {
    type Record = Payment;
    type Form = PaymentForm;

    fn resource(&self) -> Resource {
        Resource::Payments
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Payment>, DomainError> {
        let rows = PaymentEntity::find()
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await?;

        let names = student_names(&self.db, rows.iter().map(|p| p.student_id)).await?;

        rows.into_iter()
            .filter_map(|model| {
                let name = names.get(&model.student_id).cloned().unwrap_or_default();
                matches_filter(&name, filter).then(|| to_record(model, name))
            })
            .collect()
    }

    async fn find(&self, id: i32) -> Result<Option<Payment>, DomainError> {
        match PaymentEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => self.with_name(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn insert(&self, form: PaymentForm) -> Result<Payment, DomainError> {
        let now = now();
        let mut payment = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut payment, form);

        let saved = payment.insert(&self.db).await?;
        tracing::info!(
            "Recorded payment {} of {} for student {}",
            saved.id,
            saved.amount,
            saved.student_id
        );
        self.with_name(saved).await
    }

    async fn update(&self, id: i32, form: PaymentForm) -> Result<Payment, DomainError> {
        let existing = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut payment: ActiveModel = existing.into();
        apply_form(&mut payment, form);
        payment.updated_at = Set(now());

        let saved = payment.update(&self.db).await?;
        self.with_name(saved).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PaymentEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
