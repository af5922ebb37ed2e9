//! SeaORM implementation of the interaction log store

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{format_date_time, matches_filter, now, parse_date_time, student_names};
use crate::domain::records::{Interaction, InteractionForm};
use crate::domain::{DomainError, EntityStore, Resource};
use crate::models::interaction::{self, ActiveModel, Entity as InteractionEntity};

pub struct SeaOrmInteractionRepository {
    db: DatabaseConnection,
}

impl SeaOrmInteractionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_name(&self, model: interaction::Model) -> Result<Interaction, DomainError> {
        let names = student_names(&self.db, [model.student_id]).await?;
        let name = names.get(&model.student_id).cloned().unwrap_or_default();
        to_record(model, name)
    }
}

pub(crate) fn to_record(
    model: interaction::Model,
    student_name: String,
) -> Result<Interaction, DomainError> {
    Ok(Interaction {
        id: model.id,
        student_id: model.student_id,
        student_name,
        interaction_type: Some(model.r#type.parse()?),
        subject: model.subject,
        notes: model.notes,
        interaction_date: parse_date_time(model.interaction_date.as_deref())?,
        contacted_by: model.contacted_by,
    })
}

fn apply_form(active: &mut ActiveModel, form: InteractionForm) {
    active.student_id = Set(form.student_id);
    active.r#type = Set(form.interaction_type.as_str().to_owned());
    active.subject = Set(form.subject);
    active.notes = Set(form.notes);
    active.interaction_date = Set(Some(format_date_time(form.interaction_date)));
    active.contacted_by = Set(form.contacted_by);
}

#[async_trait]
impl EntityStore for SeaOrmInteractionRepository {
    type Record = Interaction;
    type Form = InteractionForm;

    fn resource(&self) -> Resource {
        Resource::Interactions
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Interaction>, DomainError> {
        let rows = InteractionEntity::find()
            .order_by_asc(interaction::Column::Id)
            .all(&self.db)
            .await?;

        let names = student_names(&self.db, rows.iter().map(|i| i.student_id)).await?;

        rows.into_iter()
            .filter_map(|model| {
                let name = names.get(&model.student_id).cloned().unwrap_or_default();
                matches_filter(&name, filter).then(|| to_record(model, name))
            })
            .collect()
    }

    async fn find(&self, id: i32) -> Result<Option<Interaction>, DomainError> {
        match InteractionEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => self.with_name(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn insert(&self, form: InteractionForm) -> Result<Interaction, DomainError> {
        let now = now();
        let mut interaction = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut interaction, form);

        let saved = interaction.insert(&self.db).await?;
        self.with_name(saved).await
    }

    async fn update(&self, id: i32, form: InteractionForm) -> Result<Interaction, DomainError> {
        let existing = InteractionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut interaction: ActiveModel = existing.into();
        apply_form(&mut interaction, form);
        interaction.updated_at = Set(now());

        let saved = interaction.update(&self.db).await?;
        self.with_name(saved).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = InteractionEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
