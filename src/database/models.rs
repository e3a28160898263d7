// Database Models
//
// Row mapping for the `users` table.

use tokio_postgres::Row;
use uuid::Uuid;

use crate::auth::password::PasswordCredential;
use crate::database::repository::RepositoryError;
use crate::users::{UserAccount, UserId};

/// Columns selected by every account lookup.
pub const USER_COLUMNS: &str = "id, phone_number, full_name, password_hash, password_salt";

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, RepositoryError>
    where
        Self: Sized;
}

impl FromRow for UserAccount {
    fn from_row(row: &Row) -> Result<Self, RepositoryError> {
        let id: Uuid = try_get(row, "id")?;
        let phone_number: String = try_get(row, "phone_number")?;
        let full_name: String = try_get(row, "full_name")?;
        let password_hash: Vec<u8> = try_get(row, "password_hash")?;
        let password_salt: Vec<u8> = try_get(row, "password_salt")?;

        Ok(UserAccount::new(
            UserId::from_uuid(id),
            phone_number,
            full_name,
            PasswordCredential::from_parts(password_hash, password_salt),
        )?)
    }
}

fn try_get<'a, T>(row: &'a Row, column: &'static str) -> Result<T, RepositoryError>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column).map_err(|e| {
        RepositoryError::Database(
            anyhow::Error::new(e).context(format!("Failed to read column {column}")),
        )
    })
}
