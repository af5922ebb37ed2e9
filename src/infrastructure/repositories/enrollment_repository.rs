//! SeaORM implementation of the enrollment store

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{format_date, matches_filter, now, parse_date, student_names};
use crate::domain::enums::parse_optional;
use crate::domain::records::{CourseSummary, Enrollment, EnrollmentForm};
use crate::domain::{DomainError, EntityStore, Resource};
use crate::models::course;
use crate::models::enrollment::{self, ActiveModel, Entity as EnrollmentEntity};

pub struct SeaOrmEnrollmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmEnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> Result<Option<Enrollment>, DomainError> {
        let Some((model, course)) = EnrollmentEntity::find_by_id(id)
            .find_also_related(course::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let names = student_names(&self.db, [model.student_id]).await?;
        let name = names.get(&model.student_id).cloned().unwrap_or_default();
        to_record(model, course, name).map(Some)
    }
}

pub(crate) fn to_record(
    model: enrollment::Model,
    course: Option<course::Model>,
    student_name: String,
) -> Result<Enrollment, DomainError> {
    Ok(Enrollment {
        id: model.id,
        student_id: model.student_id,
        student_name,
        course_id: model.course_id,
        course: course.map(|c| CourseSummary {
            id: c.id,
            course_code: c.course_code,
            title: c.title,
        }),
        enrollment_date: parse_date(model.enrollment_date.as_deref())?,
        completion_date: parse_date(model.completion_date.as_deref())?,
        status: parse_optional(model.status.as_deref())?,
        grade: model.grade,
        feedback: model.feedback,
    })
}

fn apply_form(active: &mut ActiveModel, form: EnrollmentForm) {
    active.student_id = Set(form.student_id);
    active.course_id = Set(form.course_id);
    active.enrollment_date = Set(Some(format_date(form.enrollment_date)));
    active.completion_date = Set(form.completion_date.map(format_date));
    active.status = Set(Some(form.status.as_str().to_owned()));
    active.grade = Set(form.grade);
    active.feedback = Set(form.feedback);
}

#[async_trait]
impl EntityStore for SeaOrmEnrollmentRepository {
    type Record = Enrollment;
    type Form = EnrollmentForm;

    fn resource(&self) -> Resource {
        Resource::Enrollments
    }

    /// The search term matches the student's full name.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Enrollment>, DomainError> {
        let rows = EnrollmentEntity::find()
            .find_also_related(course::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(&self.db)
            .await?;

        let names = student_names(&self.db, rows.iter().map(|(e, _)| e.student_id)).await?;

        rows.into_iter()
            .filter_map(|(model, course)| {
                let name = names.get(&model.student_id).cloned().unwrap_or_default();
                matches_filter(&name, filter).then(|| to_record(model, course, name))
            })
            .collect()
    }

    async fn find(&self, id: i32) -> Result<Option<Enrollment>, DomainError> {
        self.load(id).await
    }

    async fn insert(&self, form: EnrollmentForm) -> Result<Enrollment, DomainError> {
        let now = now();
        let mut enrollment = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut enrollment, form);

        let saved = enrollment.insert(&self.db).await?;
        self.load(saved.id).await?.ok_or(DomainError::NotFound)
    }

    async fn update(&self, id: i32, form: EnrollmentForm) -> Result<Enrollment, DomainError> {
        let existing = EnrollmentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut enrollment: ActiveModel = existing.into();
        apply_form(&mut enrollment, form);
        enrollment.updated_at = Set(now());
        enrollment.update(&self.db).await?;

        self.load(id).await?.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = EnrollmentEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
