// # Routes Module
//
// HTTP route handlers, grouped by the API area they serve.
//
// - `health`: liveness probe
// - `users`: registration, login and the caller's own profile
// - `error`: mapping of service failures onto HTTP responses

/// Health check endpoint
pub mod health;

/// User account endpoints
pub mod users;

/// API error responses
pub mod error;
