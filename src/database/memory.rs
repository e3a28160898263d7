//! In-process user store.
//!
//! Holds accounts in a map and enforces the same phone-number uniqueness
//! constraint as the `users` table. Used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::database::repository::{RepositoryError, UserRepository};
use crate::users::{UserAccount, UserId};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn phone_number_taken(
    accounts: &HashMap<UserId, UserAccount>,
    phone_number: &str,
    except: UserId,
) -> bool {
    accounts
        .values()
        .any(|other| other.id() != except && other.phone_number() == phone_number)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.id())
            || phone_number_taken(&accounts, account.phone_number(), account.id())
        {
            return Err(RepositoryError::UniqueViolation);
        }
        accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self.accounts.read().get(id).cloned())
    }

    async fn get_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self
            .accounts
            .read()
            .values()
            .find(|account| account.phone_number() == phone_number)
            .cloned())
    }

    async fn update(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write();
        if !accounts.contains_key(&account.id()) {
            return Err(RepositoryError::NoRowsAffected);
        }
        if phone_number_taken(&accounts, account.phone_number(), account.id()) {
            return Err(RepositoryError::UniqueViolation);
        }
        accounts.insert(account.id(), account.clone());
        Ok(())
    }
}
