//! Generic CRUD screen driven by an [`EntitySchema`].
//!
//! Each entity only provides a typed [`EntityStore`]; validation, decoding of
//! the submitted form and serialization of the records are shared here.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::DomainError;
use super::schema::{EntitySchema, FormMode, Resource};

/// Typed persistence for one entity.
#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    type Record: Serialize + Send;
    type Form: DeserializeOwned + Send;

    fn resource(&self) -> Resource;

    /// All records, optionally narrowed by a case-insensitive search term.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Self::Record>, DomainError>;

    async fn find(&self, id: i32) -> Result<Option<Self::Record>, DomainError>;

    async fn insert(&self, form: Self::Form) -> Result<Self::Record, DomainError>;

    async fn update(&self, id: i32, form: Self::Form) -> Result<Self::Record, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Object-safe screen the HTTP layer talks to.
#[async_trait]
pub trait CrudScreen: Send + Sync {
    fn schema(&self) -> &'static EntitySchema;

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Value>, DomainError>;

    async fn get(&self, id: i32) -> Result<Value, DomainError>;

    async fn create(&self, payload: Value) -> Result<Value, DomainError>;

    async fn update(&self, id: i32, payload: Value) -> Result<Value, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

fn to_json<T: Serialize>(record: &T) -> Result<Value, DomainError> {
    serde_json::to_value(record).map_err(|e| DomainError::Internal(e.to_string()))
}

fn decode_form<F: DeserializeOwned>(
    schema: &EntitySchema,
    payload: &Value,
    mode: FormMode,
) -> Result<F, DomainError> {
    let normalized = schema.validate(payload, mode)?;
    serde_json::from_value(normalized).map_err(|e| DomainError::invalid("", e.to_string()))
}

#[async_trait]
impl<S> CrudScreen for S
where
    S: EntityStore,
{
    fn schema(&self) -> &'static EntitySchema {
        self.resource().schema()
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Value>, DomainError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        EntityStore::list(self, filter)
            .await?
            .iter()
            .map(to_json)
            .collect()
    }

    async fn get(&self, id: i32) -> Result<Value, DomainError> {
        let record = self.find(id).await?.ok_or(DomainError::NotFound)?;
        to_json(&record)
    }

    async fn create(&self, payload: Value) -> Result<Value, DomainError> {
        let form = decode_form(self.schema(), &payload, FormMode::Create)?;
        let record = self.insert(form).await?;
        to_json(&record)
    }

    async fn update(&self, id: i32, payload: Value) -> Result<Value, DomainError> {
        let form = decode_form(self.schema(), &payload, FormMode::Update)?;
        let record = EntityStore::update(self, id, form).await?;
        to_json(&record)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        EntityStore::delete(self, id).await
    }
}
