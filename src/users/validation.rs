//! Field rules for user accounts.
//!
//! Length bounds are measured in UTF-8 bytes.

use thiserror::Error;

/// Every phone number must start with the Indonesian country prefix.
pub const PHONE_NUMBER_PREFIX: &str = "+62";

pub const PHONE_NUMBER_MIN_LEN: usize = 10;
pub const PHONE_NUMBER_MAX_LEN: usize = 13;
pub const FULL_NAME_MIN_LEN: usize = 3;
pub const FULL_NAME_MAX_LEN: usize = 60;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 64;

pub const FIELD_ID: &str = "id";
pub const FIELD_PHONE_NUMBER: &str = "phoneNumber";
pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_PASSWORD: &str = "password";

pub const CODE_PHONE_NUMBER_LENGTH: &str = "PHONE_NUMBER_LENGTH";
pub const CODE_PHONE_NUMBER_FORMAT: &str = "PHONE_NUMBER_FORMAT";
pub const CODE_FULL_NAME_LENGTH: &str = "FULL_NAME_LENGTH";
pub const CODE_PASSWORD_STRENGTH: &str = "PASSWORD_STRENGTH";
pub const CODE_REQUIRED: &str = "REQUIRED";

/// A single violated account invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty id")]
    EmptyId,

    #[error("invalid phone number length")]
    PhoneNumberLength,

    #[error("invalid phone number prefix")]
    PhoneNumberPrefix,

    #[error("invalid full name length")]
    FullNameLength,

    #[error("password is too weak")]
    WeakPassword,

    #[error("empty password hash")]
    EmptyPasswordHash,

    #[error("empty password salt")]
    EmptyPasswordSalt,
}

impl ValidationError {
    /// Client-facing field name the error is scoped to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => FIELD_ID,
            Self::PhoneNumberLength | Self::PhoneNumberPrefix => FIELD_PHONE_NUMBER,
            Self::FullNameLength => FIELD_FULL_NAME,
            Self::WeakPassword | Self::EmptyPasswordHash | Self::EmptyPasswordSalt => {
                FIELD_PASSWORD
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PhoneNumberLength => CODE_PHONE_NUMBER_LENGTH,
            Self::PhoneNumberPrefix => CODE_PHONE_NUMBER_FORMAT,
            Self::FullNameLength => CODE_FULL_NAME_LENGTH,
            Self::WeakPassword => CODE_PASSWORD_STRENGTH,
            Self::EmptyId | Self::EmptyPasswordHash | Self::EmptyPasswordSalt => CODE_REQUIRED,
        }
    }
}

pub fn valid_phone_number_length(phone_number: &str) -> bool {
    (PHONE_NUMBER_MIN_LEN..=PHONE_NUMBER_MAX_LEN).contains(&phone_number.len())
}

pub fn valid_phone_number_prefix(phone_number: &str) -> bool {
    phone_number.starts_with(PHONE_NUMBER_PREFIX)
}

pub fn valid_full_name_length(full_name: &str) -> bool {
    (FULL_NAME_MIN_LEN..=FULL_NAME_MAX_LEN).contains(&full_name.len())
}

/// Length within bounds plus one uppercase ASCII letter, one ASCII digit and one
/// character outside `[A-Za-z0-9]`.
pub fn valid_password_strength(password: &str) -> bool {
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return false;
    }

    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Check length first, then prefix.
pub fn check_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if !valid_phone_number_length(phone_number) {
        return Err(ValidationError::PhoneNumberLength);
    }
    if !valid_phone_number_prefix(phone_number) {
        return Err(ValidationError::PhoneNumberPrefix);
    }
    Ok(())
}

pub fn check_full_name(full_name: &str) -> Result<(), ValidationError> {
    if !valid_full_name_length(full_name) {
        return Err(ValidationError::FullNameLength);
    }
    Ok(())
}

pub fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    if !valid_password_strength(password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}
