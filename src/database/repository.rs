//! User Repository
//!
//! Storage boundary for user accounts. Implementations only store and load whole
//! account snapshots; they never edit individual fields.

use async_trait::async_trait;
use thiserror::Error;

use crate::users::{UserAccount, UserId, ValidationError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A write would duplicate a unique column (the phone number).
    #[error("unique violation")]
    UniqueViolation,

    #[error("no rows affected")]
    NoRowsAffected,

    /// A stored row no longer satisfies the account rules.
    #[error("stored account is invalid: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Persistence for [`UserAccount`]. Lookups return `Ok(None)` when nothing matches.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn store(&self, account: &UserAccount) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError>;

    async fn get_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserAccount>, RepositoryError>;

    async fn update(&self, account: &UserAccount) -> Result<(), RepositoryError>;
}
