//! Repository trait definitions
//!
//! These traits define the contract for data access beyond plain CRUD.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use super::records::{StudentProfile, User};

/// Read side used by the report assembler.
#[async_trait]
pub trait StudentReportSource: Send + Sync {
    /// Load a student and all of its enrollments, payments and interactions
    /// in one go. `Ok(None)` when no such student exists.
    async fn find_with_relations(&self, id: i32) -> Result<Option<StudentProfile>, DomainError>;
}

/// Login account stored together with its credential.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

/// Account lookups needed by authentication.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, DomainError>;

    async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
