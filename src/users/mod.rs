//! # Users Module
//!
//! The user account aggregate and the field rules it enforces.

pub mod account;
pub mod validation;

pub use account::{AccountError, UserAccount, UserId};
pub use validation::ValidationError;
