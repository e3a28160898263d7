//! Authentication Service
//!
//! Resolves phone number + password credentials to an account.

use std::sync::Arc;

use thiserror::Error;

use crate::database::repository::{RepositoryError, UserRepository};
use crate::users::UserAccount;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    InvalidPassword,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// True for credential failures. Callers must not reveal which one occurred.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::InvalidPassword)
    }
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<UserAccount, AuthError> {
        let account = self
            .users
            .get_by_phone_number(phone_number)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !account.verify_password(password) {
            return Err(AuthError::InvalidPassword);
        }

        Ok(account)
    }
}
