//! API error responses.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::auth::TokenError;
use crate::services::{AuthError, UserServiceError};
use crate::users::ValidationError;

/// Error codes reported for one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub name: String,
    pub codes: Vec<String>,
}

/// Collects failed field checks, grouped per field.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<&'static str>>);

impl FieldErrors {
    pub fn add(&mut self, error: ValidationError) {
        self.0.entry(error.field()).or_default().push(error.code());
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(ApiError::Validation(
            self.0
                .into_iter()
                .map(|(name, codes)| FieldError {
                    name: name.to_string(),
                    codes: codes.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        ))
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 with the per-field error list
    Validation(Vec<FieldError>),
    /// 400 with an empty body, whatever the reason
    AuthenticationFailed,
    NotFound,
    Conflict,
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(vec![FieldError {
            name: err.field().to_string(),
            codes: vec![err.code().to_string()],
        }])
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(e) => e.into(),
            UserServiceError::PhoneNumberAlreadyTaken => Self::Conflict,
            UserServiceError::NotFound => Self::NotFound,
            UserServiceError::Randomness(e) => Self::Internal(e.into()),
            UserServiceError::Repository(e) => Self::Internal(e.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_authentication_failure() {
            tracing::debug!("Login rejected: {}", err);
            return Self::AuthenticationFailed;
        }
        Self::Internal(err.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::AuthenticationFailed => StatusCode::BAD_REQUEST.into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Conflict => StatusCode::CONFLICT.into_response(),
            Self::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
