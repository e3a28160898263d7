//! Postgres-backed [`UserRepository`].

use anyhow::Context;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;

use crate::database::models::{FromRow, USER_COLUMNS};
use crate::database::repository::{RepositoryError, UserRepository};
use crate::users::{UserAccount, UserId};

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, RepositoryError> {
        Ok(self
            .pool
            .get()
            .await
            .context("Failed to get DB connection")?)
    }
}

/// SQLSTATE 23505 becomes [`RepositoryError::UniqueViolation`].
fn write_error(err: tokio_postgres::Error, action: &'static str) -> RepositoryError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        return RepositoryError::UniqueViolation;
    }
    RepositoryError::Database(anyhow::Error::new(err).context(action))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn store(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let client = self.client().await?;
        let id = account.id();
        let credential = account.credential();

        client
            .execute(
                "INSERT INTO users (id, phone_number, full_name, password_hash, password_salt) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    id.as_uuid(),
                    &account.phone_number(),
                    &account.full_name(),
                    &credential.hash(),
                    &credential.salt(),
                ],
            )
            .await
            .map_err(|e| write_error(e, "Failed to insert user"))?;
        Ok(())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
                &[id.as_uuid()],
            )
            .await
            .context("Failed to query user by id")?;

        row.as_ref().map(UserAccount::from_row).transpose()
    }

    async fn get_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE phone_number = $1"),
                &[&phone_number],
            )
            .await
            .context("Failed to query user by phone number")?;

        row.as_ref().map(UserAccount::from_row).transpose()
    }

    async fn update(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let client = self.client().await?;
        let id = account.id();
        let credential = account.credential();

        let affected = client
            .execute(
                "UPDATE users SET phone_number = $1, full_name = $2, password_hash = $3, \
                 password_salt = $4, updated_at = NOW() WHERE id = $5",
                &[
                    &account.phone_number(),
                    &account.full_name(),
                    &credential.hash(),
                    &credential.salt(),
                    id.as_uuid(),
                ],
            )
            .await
            .map_err(|e| write_error(e, "Failed to update user"))?;

        if affected == 0 {
            return Err(RepositoryError::NoRowsAffected);
        }
        Ok(())
    }
}
