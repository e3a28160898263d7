pub mod auth;
pub mod config;
pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod users;

#[cfg(test)]
mod testing;
