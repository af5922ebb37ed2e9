//! SeaORM implementation of the instructor store

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

use super::{contains_literal, now};
use crate::domain::records::{Instructor, InstructorForm};
use crate::domain::{DomainError, EntityStore, Resource};
use crate::models::course;
use crate::models::instructor::{self, ActiveModel, Entity as InstructorEntity};

pub struct SeaOrmInstructorRepository {
    db: DatabaseConnection,
}

impl SeaOrmInstructorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn course_count(&self, id: i32) -> Result<u64, DomainError> {
        Ok(course::Entity::find()
            .filter(course::Column::InstructorId.eq(id))
            .count(&self.db)
            .await?)
    }
}

fn to_record(model: instructor::Model, course_count: u64) -> Instructor {
    Instructor {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        specialization: model.specialization,
        bio: model.bio,
        user_id: model.user_id,
        course_count,
    }
}

fn apply_form(active: &mut ActiveModel, form: InstructorForm) {
    active.first_name = Set(form.first_name);
    active.last_name = Set(form.last_name);
    active.email = Set(form.email);
    active.phone = Set(form.phone);
    active.specialization = Set(form.specialization);
    active.bio = Set(form.bio);
    active.user_id = Set(form.user_id);
}

#[async_trait]
impl EntityStore for SeaOrmInstructorRepository {
    type Record = Instructor;
    type Form = InstructorForm;

    fn resource(&self) -> Resource {
        Resource::Instructors
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Instructor>, DomainError> {
        let mut query = InstructorEntity::find().order_by_asc(instructor::Column::Id);

        if let Some(term) = filter {
            query = query.filter(
                Condition::any()
                    .add(contains_literal(instructor::Column::FirstName, term))
                    .add(contains_literal(instructor::Column::LastName, term))
                    .add(contains_literal(instructor::Column::Specialization, term)),
            );
        }

        let instructors = query.all(&self.db).await?;

        let mut counts: HashMap<i32, u64> = HashMap::new();
        for c in course::Entity::find()
            .filter(course::Column::InstructorId.is_not_null())
            .all(&self.db)
            .await?
        {
            if let Some(id) = c.instructor_id {
                *counts.entry(id).or_default() += 1;
            }
        }

        Ok(instructors
            .into_iter()
            .map(|i| {
                let count = counts.get(&i.id).copied().unwrap_or(0);
                to_record(i, count)
            })
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Instructor>, DomainError> {
        match InstructorEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(to_record(model, self.course_count(id).await?))),
            None => Ok(None),
        }
    }

    async fn insert(&self, form: InstructorForm) -> Result<Instructor, DomainError> {
        let now = now();
        let mut instructor = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut instructor, form);

        let saved = instructor.insert(&self.db).await?;
        Ok(to_record(saved, 0))
    }

    async fn update(&self, id: i32, form: InstructorForm) -> Result<Instructor, DomainError> {
        let existing = InstructorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut instructor: ActiveModel = existing.into();
        apply_form(&mut instructor, form);
        instructor.updated_at = Set(now());

        let saved = instructor.update(&self.db).await?;
        Ok(to_record(saved, self.course_count(id).await?))
    }

    /// Courses taught by the instructor stay in the catalogue, unassigned.
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        course::Entity::update_many()
            .col_expr(course::Column::InstructorId, Expr::value(Option::<i32>::None))
            .filter(course::Column::InstructorId.eq(id))
            .exec(&txn)
            .await?;

        let result = InstructorEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}
