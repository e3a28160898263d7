//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::auth::jwt::TokenKeys;
use crate::database::memory::InMemoryUserRepository;
use crate::database::repository::{RepositoryError, UserRepository};
use crate::users::{UserAccount, UserId};

pub const PRIVATE_KEY_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/private.pem"));
pub const PUBLIC_KEY_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/public.pem"));
pub const OTHER_PRIVATE_KEY_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/other_private.pem"));
pub const OTHER_PUBLIC_KEY_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/other_public.pem"));

pub const PASSWORD: &str = "Secret123!";

pub fn token_keys() -> TokenKeys {
    TokenKeys::from_rsa_pem(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM).unwrap()
}

/// A key pair unrelated to [`token_keys`].
pub fn other_token_keys() -> TokenKeys {
    TokenKeys::from_rsa_pem(OTHER_PRIVATE_KEY_PEM, OTHER_PUBLIC_KEY_PEM).unwrap()
}

pub fn account_with_phone(phone_number: &str) -> UserAccount {
    UserAccount::with_password(UserId::generate(), phone_number, "John Doe", PASSWORD).unwrap()
}

pub fn sample_account() -> UserAccount {
    account_with_phone("+628174546647")
}

/// Wraps the in-memory store, counting writes.
///
/// With `stale_phone_lookups` set, phone-number lookups always miss, which
/// reproduces a concurrent writer slipping in between check and write.
#[derive(Default)]
pub struct CountingRepository {
    pub inner: InMemoryUserRepository,
    pub stale_phone_lookups: bool,
    stores: AtomicUsize,
    updates: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_phone_lookups() -> Self {
        Self {
            stale_phone_lookups: true,
            ..Self::default()
        }
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn store(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(account).await
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        if self.stale_phone_lookups {
            return Ok(None);
        }
        self.inner.get_by_phone_number(phone_number).await
    }

    async fn update(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(account).await
    }
}
