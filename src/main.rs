//! # User Service
//!
//! HTTP API for phone-number based user accounts: registration, login with
//! RS256 access tokens, and self-service profile reads and updates.
//!
//! ## Environment Setup
//! Copy `.env.example` to `.env` and point `JWT_PRIVATE_KEY_PATH` and
//! `JWT_PUBLIC_KEY_PATH` at an RSA key pair. Set `DATABASE_URL` to persist
//! accounts in PostgreSQL.
//!
//! ## Running the Server
//! ```bash
//! cargo run
//! curl http://localhost:3000/ping
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use user_service::{config::Config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false) // cleaner output
                .compact(),
        )
        .init();

    tracing::info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build profile: {}",
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let config = Config::from_env()?;
    server::start(config).await
}
