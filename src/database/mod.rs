//! # Database Module
//!
//! Account persistence: the repository contract, a Postgres implementation using
//! tokio-postgres with a deadpool pool, and an in-memory implementation.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod repository;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::{RepositoryError, UserRepository};
