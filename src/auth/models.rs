//! Authentication Models
//!
//! Data structures for login requests, responses, and the authenticated subject.

use serde::{Deserialize, Serialize};

use crate::users::UserId;

/// Authenticated account extracted from a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
}

/// Login request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: UserId,
    pub access_token: String,
}
