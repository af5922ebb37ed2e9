//! SeaORM implementation of the user account store

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{contains_literal, now};
use crate::domain::records::{User, UserForm};
use crate::domain::{AccountRepository, Credentials, DomainError, EntityStore, Resource};
use crate::infrastructure::auth::hash_password;
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_record(model: &user::Model) -> Result<User, DomainError> {
    Ok(User {
        id: model.id,
        username: model.username.clone(),
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        email: model.email.clone(),
        role: model.role.parse()?,
        enabled: model.enabled,
        account_non_locked: model.account_non_locked,
    })
}

/// Hash a submitted password after checking its confirmation.
pub(crate) fn hash_confirmed(
    password: &str,
    confirm: Option<&str>,
) -> Result<String, DomainError> {
    if confirm != Some(password) {
        return Err(DomainError::invalid("confirm_password", "Passwords do not match"));
    }
    hash_password(password).map_err(DomainError::Internal)
}

fn apply_form(active: &mut ActiveModel, form: &UserForm) {
    active.username = Set(form.username.clone());
    active.first_name = Set(form.first_name.clone());
    active.last_name = Set(form.last_name.clone());
    active.email = Set(form.email.clone());
    active.role = Set(form.role.as_str().to_owned());
    active.enabled = Set(form.enabled);
    active.account_non_locked = Set(form.account_non_locked);
}

#[async_trait]
impl EntityStore for SeaOrmUserRepository {
    type Record = User;
    type Form = UserForm;

    fn resource(&self) -> Resource {
        Resource::Users
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<User>, DomainError> {
        let mut query = UserEntity::find().order_by_asc(user::Column::Id);

        if let Some(term) = filter {
            query = query.filter(
                Condition::any()
                    .add(contains_literal(user::Column::Username, term))
                    .add(contains_literal(user::Column::FirstName, term))
                    .add(contains_literal(user::Column::LastName, term)),
            );
        }

        query.all(&self.db).await?.iter().map(to_record).collect()
    }

    async fn find(&self, id: i32) -> Result<Option<User>, DomainError> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .as_ref()
            .map(to_record)
            .transpose()
    }

    async fn insert(&self, form: UserForm) -> Result<User, DomainError> {
        let Some(password) = form.password.as_deref() else {
            return Err(DomainError::invalid("password", "Password is required for new users"));
        };
        let password_hash = hash_confirmed(password, form.confirm_password.as_deref())?;

        let now = now();
        let mut account = ActiveModel {
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_form(&mut account, &form);

        let saved = account.insert(&self.db).await?;
        tracing::info!("Created user {} with role {}", saved.username, saved.role);
        to_record(&saved)
    }

    /// A blank password on update keeps the current one.
    async fn update(&self, id: i32, form: UserForm) -> Result<User, DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut account: ActiveModel = existing.into();
        apply_form(&mut account, &form);
        if let Some(password) = form.password.as_deref() {
            let hash = hash_confirmed(password, form.confirm_password.as_deref())?;
            account.password_hash = Set(hash);
        }
        account.updated_at = Set(now());

        to_record(&account.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for SeaOrmUserRepository {
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, DomainError> {
        let Some(model) = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(Credentials {
            user: to_record(&model)?,
            password_hash: model.password_hash,
        }))
    }

    async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<(), DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut account: ActiveModel = existing.into();
        account.password_hash = Set(password_hash);
        account.updated_at = Set(now());
        account.update(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(UserEntity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::UserRole;
    use crate::infrastructure::auth::verify_password;
    use crate::infrastructure::db;

    fn form(password: Option<&str>, confirm: Option<&str>) -> UserForm {
        UserForm {
            username: "ijichi".to_string(),
            first_name: "Kiyotaka".to_string(),
            last_name: "Ijichi".to_string(),
            email: "ijichi@campus.test".to_string(),
            role: UserRole::Staff,
            enabled: true,
            account_non_locked: true,
            password: password.map(str::to_string),
            confirm_password: confirm.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let db = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmUserRepository::new(db);

        let err = repo.insert(form(Some("one"), Some("two"))).await.unwrap_err();
        match err {
            DomainError::Invalid(fields) => {
                assert_eq!(fields[0].field, "confirm_password");
                assert_eq!(fields[0].message, "Passwords do not match");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_without_password_keeps_the_hash() {
        let db = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmUserRepository::new(db);

        let created = repo.insert(form(Some("pw"), Some("pw"))).await.unwrap();
        EntityStore::update(&repo, created.id, form(None, None)).await.unwrap();

        let creds = repo.find_credentials("ijichi").await.unwrap().unwrap();
        assert!(verify_password("pw", &creds.password_hash).unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
