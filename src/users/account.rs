//! User Account
//!
//! The account aggregate. Every constructor and setter re-checks the field rules,
//! so a `UserAccount` value always satisfies them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::{PasswordCredential, RandomnessError};
use crate::users::validation::{self, ValidationError};

/// Globally unique, time-ordered account identifier (UUIDv7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new identifier. Ids created later sort after earlier ones.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Failure to build an account from a plaintext password.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Randomness(#[from] RandomnessError),
}

/// One registered person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    phone_number: String,
    full_name: String,
    credential: PasswordCredential,
}

impl UserAccount {
    /// Rebuild an account from its parts, failing on the first violated rule.
    pub fn new(
        id: UserId,
        phone_number: impl Into<String>,
        full_name: impl Into<String>,
        credential: PasswordCredential,
    ) -> Result<Self, ValidationError> {
        let phone_number = phone_number.into();
        let full_name = full_name.into();

        if id.as_uuid().is_nil() {
            return Err(ValidationError::EmptyId);
        }
        validation::check_phone_number(&phone_number)?;
        validation::check_full_name(&full_name)?;
        if credential.hash().is_empty() {
            return Err(ValidationError::EmptyPasswordHash);
        }
        if credential.salt().is_empty() {
            return Err(ValidationError::EmptyPasswordSalt);
        }

        Ok(Self {
            id,
            phone_number,
            full_name,
            credential,
        })
    }

    /// Create an account for a new registration, hashing `password` under a fresh salt.
    ///
    /// Password strength is only enforced here.
    pub fn with_password(
        id: UserId,
        phone_number: impl Into<String>,
        full_name: impl Into<String>,
        password: &str,
    ) -> Result<Self, AccountError> {
        validation::check_password_strength(password)?;
        let credential = PasswordCredential::generate(password)?;
        Ok(Self::new(id, phone_number, full_name, credential)?)
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn credential(&self) -> &PasswordCredential {
        &self.credential
    }

    /// Replace the phone number. Uniqueness across accounts is not checked here.
    pub fn change_phone_number(
        &mut self,
        phone_number: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let phone_number = phone_number.into();
        validation::check_phone_number(&phone_number)?;
        self.phone_number = phone_number;
        Ok(())
    }

    pub fn change_full_name(&mut self, full_name: impl Into<String>) -> Result<(), ValidationError> {
        let full_name = full_name.into();
        validation::check_full_name(&full_name)?;
        self.full_name = full_name;
        Ok(())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.credential.verify(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = "+628174546647";
    const NAME: &str = "John Doe";
    const PASSWORD: &str = "Secret123!";

    fn account() -> UserAccount {
        UserAccount::with_password(UserId::generate(), PHONE, NAME, PASSWORD).unwrap()
    }

    #[test]
    fn test_with_password_and_verify() {
        let account = account();
        assert_eq!(account.phone_number(), PHONE);
        assert_eq!(account.full_name(), NAME);
        assert!(account.verify_password(PASSWORD));
        assert!(!account.verify_password("Secret123?"));
        assert!(!account.verify_password("wrong"));
    }

    #[test]
    fn test_valid_inputs_always_verify() {
        let long_name = "x".repeat(60);
        let cases = [
            ("+6281234567", "Ann", "A1!bcd"),
            ("+628123456789", "Budi Santoso", "Pa$$w0rd"),
            ("+62812345678", long_name.as_str(), "ÜnicodeName 9 Z"),
        ];
        for (phone, name, password) in cases {
            let account = UserAccount::with_password(UserId::generate(), phone, name, password)
                .unwrap_or_else(|e| panic!("{phone}/{name}: {e}"));
            assert!(account.verify_password(password));
            assert!(!account.verify_password(&format!("{password}x")));
        }
    }

    #[test]
    fn test_weak_password_rejected() {
        let err = UserAccount::with_password(UserId::generate(), PHONE, NAME, "weak").unwrap_err();
        assert!(matches!(err, AccountError::Invalid(ValidationError::WeakPassword)));
    }

    #[test]
    fn test_invalid_phone_numbers_rejected() {
        let cases = [
            ("+62817454", ValidationError::PhoneNumberLength),
            ("+6281745466470", ValidationError::PhoneNumberLength),
            ("+618174546647", ValidationError::PhoneNumberPrefix),
            ("0628174546647", ValidationError::PhoneNumberPrefix),
        ];
        for (phone, expected) in cases {
            let err =
                UserAccount::with_password(UserId::generate(), phone, NAME, PASSWORD).unwrap_err();
            assert!(
                matches!(err, AccountError::Invalid(e) if e == expected),
                "phone {phone}"
            );
        }
    }

    #[test]
    fn test_new_rejects_empty_credential_parts() {
        let err = UserAccount::new(
            UserId::generate(),
            PHONE,
            NAME,
            PasswordCredential::from_parts(vec![], vec![1; 16]),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPasswordHash);

        let err = UserAccount::new(
            UserId::generate(),
            PHONE,
            NAME,
            PasswordCredential::from_parts(vec![1; 32], vec![]),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPasswordSalt);
    }

    #[test]
    fn test_new_rejects_nil_id() {
        let credential = PasswordCredential::generate(PASSWORD).unwrap();
        let err = UserAccount::new(UserId::from_uuid(Uuid::nil()), PHONE, NAME, credential)
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyId);
    }

    #[test]
    fn test_change_phone_number() {
        let mut account = account();
        account.change_phone_number("+628174546648").unwrap();
        assert_eq!(account.phone_number(), "+628174546648");

        assert_eq!(
            account.change_phone_number("+62817454"),
            Err(ValidationError::PhoneNumberLength)
        );
        assert_eq!(
            account.change_phone_number("+618174546647"),
            Err(ValidationError::PhoneNumberPrefix)
        );
        assert_eq!(account.phone_number(), "+628174546648");
    }

    #[test]
    fn test_change_full_name() {
        let mut account = account();
        account.change_full_name("John Wick").unwrap();
        assert_eq!(account.full_name(), "John Wick");

        assert_eq!(account.change_full_name("Jo"), Err(ValidationError::FullNameLength));
        assert_eq!(account.full_name(), "John Wick");
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let first = UserId::generate();
        let second = UserId::generate();
        assert_ne!(first, second);
        assert!(first < second);
        assert_eq!(first.to_string().parse::<UserId>().unwrap(), first);
    }
}
