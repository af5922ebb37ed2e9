//! Domain layer - Pure business abstractions
//!
//! Records, forms, screen schemas, the access table and repository traits.
//! Only the `DbErr` conversion in `errors` knows about the ORM.

pub mod access;
pub mod enums;
pub mod errors;
pub mod records;
pub mod repositories;
pub mod schema;
pub mod screen;

pub use errors::{DomainError, FieldError};
pub use repositories::*;
pub use schema::Resource;
pub use screen::{CrudScreen, EntityStore};
