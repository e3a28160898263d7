//! Configuration module for environment variables and application settings

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::Duration;

use crate::auth::jwt::DEFAULT_TOKEN_VALIDITY;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration. Without it accounts live in memory only.
    pub database: Option<DatabaseConfig>,

    /// Access token configuration
    pub token: TokenConfig,

    /// Origins allowed to call the API from a browser
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub validity: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let validity_secs: i64 = parse_or(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_VALIDITY.num_seconds())?;

        Ok(Self {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
                    Some(port) => port.parse().context("Invalid SERVER_PORT")?,
                    None => 3000,
                },
            },

            database: match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
                Some(url) => Some(DatabaseConfig {
                    url,
                    max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 16)?,
                }),
                None => None,
            },

            token: TokenConfig {
                private_key_path: lookup("JWT_PRIVATE_KEY_PATH")
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow!("JWT_PRIVATE_KEY_PATH environment variable is required"))?,
                public_key_path: lookup("JWT_PUBLIC_KEY_PATH")
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow!("JWT_PUBLIC_KEY_PATH environment variable is required"))?,
                validity: Duration::try_seconds(validity_secs)
                    .ok_or_else(|| anyhow!("TOKEN_TTL_SECS out of range: {validity_secs}"))?,
            },

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {key}: {value:?}")),
        None => Ok(default),
    }
}
