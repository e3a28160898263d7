//! # Services Module
//!
//! Application services for the user API: credential authentication,
//! registration and profile management.

pub mod auth;
pub mod users;

pub use auth::{AuthError, AuthService};
pub use users::{ProfileUpdate, UserService, UserServiceError};
