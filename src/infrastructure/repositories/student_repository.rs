//! SeaORM implementation of the student store and the report read side

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{
    contains_literal, enrollment_repository, format_date, interaction_repository, now, parse_date,
    payment_repository,
};
use crate::domain::enums::parse_optional;
use crate::domain::records::{Student, StudentForm, StudentProfile};
use crate::domain::{DomainError, EntityStore, Resource, StudentReportSource};
use crate::models::student::{self, ActiveModel, Entity as StudentEntity};
use crate::models::{course, enrollment, interaction, payment};

/// SeaORM-based student repository
pub struct SeaOrmStudentRepository {
    db: DatabaseConnection,
}

impl SeaOrmStudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn to_record(model: student::Model) -> Result<Student, DomainError> {
    Ok(Student {
        id: model.id,
        student_id: model.student_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        status: parse_optional(model.status.as_deref())?,
        enrollment_date: parse_date(model.enrollment_date.as_deref())?,
        graduation_date: parse_date(model.graduation_date.as_deref())?,
    })
}

fn apply_form(active: &mut ActiveModel, form: StudentForm) {
    active.student_id = Set(Some(form.student_id));
    active.first_name = Set(form.first_name);
    active.last_name = Set(form.last_name);
    active.email = Set(form.email);
    active.phone = Set(form.phone);
    active.status = Set(form.status.map(|s| s.as_str().to_owned()));
    active.enrollment_date = Set(form.enrollment_date.map(format_date));
    active.graduation_date = Set(form.graduation_date.map(format_date));
}

#[async_trait]
impl EntityStore for SeaOrmStudentRepository {
    type Record = Student;
    type Form = StudentForm;

    fn resource(&self) -> Resource {
        Resource::Students
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Student>, DomainError> {
        let mut query = StudentEntity::find().order_by_asc(student::Column::Id);

        if let Some(term) = filter {
            query = query.filter(
                Condition::any()
                    .add(contains_literal(student::Column::FirstName, term))
                    .add(contains_literal(student::Column::LastName, term))
                    .add(contains_literal(student::Column::StudentId, term)),
            );
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_record)
            .collect()
    }

    async fn find(&self, id: i32) -> Result<Option<Student>, DomainError> {
        StudentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_record)
            .transpose()
    }

    async fn insert(&self, form: StudentForm) -> Result<Student, DomainError> {
        let now = now();
        let mut student = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut student, form);

        let saved = student.insert(&self.db).await?;
        tracing::info!("Created student {} ({:?})", saved.id, saved.student_id);
        to_record(saved)
    }

    async fn update(&self, id: i32, form: StudentForm) -> Result<Student, DomainError> {
        let existing = StudentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut student: ActiveModel = existing.into();
        apply_form(&mut student, form);
        student.updated_at = Set(now());

        to_record(student.update(&self.db).await?)
    }

    /// Removes the student together with everything it owns.
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        enrollment::Entity::delete_many()
            .filter(enrollment::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        payment::Entity::delete_many()
            .filter(payment::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        interaction::Entity::delete_many()
            .filter(interaction::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;

        let result = StudentEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound);
        }

        txn.commit().await?;
        tracing::info!("Deleted student {} and its related records", id);
        Ok(())
    }
}

#[async_trait]
impl StudentReportSource for SeaOrmStudentRepository {
    async fn find_with_relations(&self, id: i32) -> Result<Option<StudentProfile>, DomainError> {
        // One read transaction so the profile is a consistent snapshot.
        let txn = self.db.begin().await?;

        let Some(model) = StudentEntity::find_by_id(id).one(&txn).await? else {
            txn.commit().await?;
            return Ok(None);
        };
        let student = to_record(model)?;
        let name = student.full_name();

        let enrollments = enrollment::Entity::find()
            .find_also_related(course::Entity)
            .filter(enrollment::Column::StudentId.eq(id))
            .order_by_asc(enrollment::Column::Id)
            .all(&txn)
            .await?;
        let payments = payment::Entity::find()
            .filter(payment::Column::StudentId.eq(id))
            .order_by_asc(payment::Column::Id)
            .all(&txn)
            .await?;
        let interactions = interaction::Entity::find()
            .filter(interaction::Column::StudentId.eq(id))
            .order_by_asc(interaction::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(Some(StudentProfile {
            enrollments: enrollments
                .into_iter()
                .map(|(e, c)| enrollment_repository::to_record(e, c, name.clone()))
                .collect::<Result<_, _>>()?,
            payments: payments
                .into_iter()
                .map(|p| payment_repository::to_record(p, name.clone()))
                .collect::<Result<_, _>>()?,
            interactions: interactions
                .into_iter()
                .map(|i| interaction_repository::to_record(i, name.clone()))
                .collect::<Result<_, _>>()?,
            student,
        }))
    }
}
