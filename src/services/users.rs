//! User Service
//!
//! Registration, profile reads and profile updates on top of a [`UserRepository`].

use std::sync::Arc;

use thiserror::Error;

use crate::auth::password::RandomnessError;
use crate::database::repository::{RepositoryError, UserRepository};
use crate::users::{AccountError, UserAccount, UserId, ValidationError};

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Randomness(#[from] RandomnessError),

    #[error("phone number already taken")]
    PhoneNumberAlreadyTaken,

    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<AccountError> for UserServiceError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Invalid(e) => Self::Validation(e),
            AccountError::Randomness(e) => Self::Randomness(e),
        }
    }
}

// A unique violation can only come from the phone number column.
impl From<RepositoryError> for UserServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation => Self::PhoneNumberAlreadyTaken,
            other => Self::Repository(other),
        }
    }
}

/// Requested profile changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn register(
        &self,
        phone_number: &str,
        full_name: &str,
        password: &str,
    ) -> Result<UserAccount, UserServiceError> {
        let account =
            UserAccount::with_password(UserId::generate(), phone_number, full_name, password)?;
        self.users.store(&account).await?;

        tracing::info!("Registered user {}", account.id());
        Ok(account)
    }

    pub async fn get_profile(&self, id: &UserId) -> Result<Option<UserAccount>, UserServiceError> {
        Ok(self.users.get_by_id(id).await?)
    }

    /// Apply the fields that actually differ and persist the snapshot.
    ///
    /// The phone number uniqueness probe and the write are not atomic; a writer
    /// racing in between is caught by the store's unique constraint.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<(), UserServiceError> {
        let mut account = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound)?;
        let mut modified = false;

        if let Some(full_name) = update.full_name.filter(|n| n != account.full_name()) {
            account.change_full_name(full_name)?;
            modified = true;
        }

        if let Some(phone_number) = update.phone_number.filter(|p| p != account.phone_number()) {
            account.change_phone_number(phone_number)?;

            if let Some(other) = self.users.get_by_phone_number(account.phone_number()).await? {
                if other.id() != account.id() {
                    return Err(UserServiceError::PhoneNumberAlreadyTaken);
                }
            }
            modified = true;
        }

        if !modified {
            tracing::debug!("Profile of user {} unchanged, skipping write", id);
            return Ok(());
        }

        self.users.update(&account).await?;
        tracing::info!("Updated profile of user {}", id);
        Ok(())
    }
}
