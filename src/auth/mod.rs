//! # Authentication Module
//!
//! Password hashing, RS256 token issuance and validation, and the middleware
//! that authenticates bearer tokens on protected endpoints.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{TokenError, TokenIssuer, TokenKeys, TokenVerifier};
pub use middleware::AuthMiddleware;
pub use models::AuthUser;
