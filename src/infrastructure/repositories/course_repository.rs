//! SeaORM implementation of the course catalogue store

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{contains_literal, now};
use crate::domain::enums::parse_optional;
use crate::domain::records::{Course, CourseForm};
use crate::domain::{DomainError, EntityStore, Resource};
use crate::models::course::{self, ActiveModel, Entity as CourseEntity};
use crate::models::instructor;

pub struct SeaOrmCourseRepository {
    db: DatabaseConnection,
}

impl SeaOrmCourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> Result<Option<Course>, DomainError> {
        CourseEntity::find_by_id(id)
            .find_also_related(instructor::Entity)
            .one(&self.db)
            .await?
            .map(|(c, i)| to_record(c, i))
            .transpose()
    }
}

fn to_record(
    model: course::Model,
    instructor: Option<instructor::Model>,
) -> Result<Course, DomainError> {
    Ok(Course {
        id: model.id,
        course_code: model.course_code,
        title: model.title,
        description: model.description,
        credits: model.credits,
        duration_weeks: model.duration_weeks,
        level: parse_optional(model.level.as_deref())?,
        instructor_id: model.instructor_id,
        instructor_name: instructor.map(|i| format!("{} {}", i.first_name, i.last_name)),
    })
}

fn apply_form(active: &mut ActiveModel, form: CourseForm) {
    active.course_code = Set(form.course_code);
    active.title = Set(form.title);
    active.description = Set(form.description);
    active.credits = Set(Some(form.credits));
    active.duration_weeks = Set(Some(form.duration_weeks));
    active.level = Set(Some(form.level.as_str().to_owned()));
    active.instructor_id = Set(form.instructor_id);
}

#[async_trait]
impl EntityStore for SeaOrmCourseRepository {
    type Record = Course;
    type Form = CourseForm;

    fn resource(&self) -> Resource {
        Resource::Courses
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Course>, DomainError> {
        let mut query = CourseEntity::find()
            .find_also_related(instructor::Entity)
            .order_by_asc(course::Column::Id);

        if let Some(term) = filter {
            query = query.filter(
                Condition::any()
                    .add(contains_literal(course::Column::CourseCode, term))
                    .add(contains_literal(course::Column::Title, term)),
            );
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(c, i)| to_record(c, i))
            .collect()
    }

    async fn find(&self, id: i32) -> Result<Option<Course>, DomainError> {
        self.load(id).await
    }

    async fn insert(&self, form: CourseForm) -> Result<Course, DomainError> {
        let now = now();
        let mut course = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut course, form);

        let saved = course.insert(&self.db).await?;
        tracing::info!("Created course {} ({})", saved.id, saved.course_code);
        self.load(saved.id).await?.ok_or(DomainError::NotFound)
    }

    async fn update(&self, id: i32, form: CourseForm) -> Result<Course, DomainError> {
        let existing = CourseEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut course: ActiveModel = existing.into();
        apply_form(&mut course, form);
        course.updated_at = Set(now());
        course.update(&self.db).await?;

        self.load(id).await?.ok_or(DomainError::NotFound)
    }

    /// Enrollments in the course go with it.
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CourseEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
