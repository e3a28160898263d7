//! # Server Module
//!
//! HTTP server setup and route configuration for the user service.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use chrono::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{TokenIssuer, TokenKeys, TokenVerifier};
use crate::config::Config;
use crate::database::{self, DatabaseConnection, InMemoryUserRepository, PgUserRepository, UserRepository};
use crate::routes::{health::ping, users};
use crate::services::{AuthService, UserService};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    pub token_issuer: Arc<TokenIssuer>,
    pub token_verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(repository: Arc<dyn UserRepository>, keys: &TokenKeys, token_validity: Duration) -> Self {
        Self {
            users: Arc::new(UserService::new(repository.clone())),
            auth: Arc::new(AuthService::new(repository)),
            token_issuer: Arc::new(TokenIssuer::new(keys, token_validity)),
            token_verifier: Arc::new(TokenVerifier::new(keys)),
        }
    }
}

/// Build the application router without transport concerns such as CORS.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(users::create_user_routes(&app_state))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
}

async fn user_repository(config: &Config) -> Result<Arc<dyn UserRepository>> {
    let Some(settings) = &config.database else {
        tracing::warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryUserRepository::new()));
    };

    let db_config = database::DatabaseConfig::from_url(&settings.url, settings.max_connections)?;
    let db = DatabaseConnection::new(db_config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;

    Ok(Arc::new(PgUserRepository::new(db.pool().clone())))
}

/// Starts the HTTP server and serves until a shutdown signal arrives.
pub async fn start(config: Config) -> Result<()> {
    let keys = TokenKeys::load(&config.token.private_key_path, &config.token.public_key_path)?;
    let repository = user_repository(&config).await?;
    let app_state = AppState::new(repository, &keys, config.token.validity);

    let app = router(app_state).layer(cors_layer(&config.cors_allowed_origins)?);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind to {}:{} - port may already be in use",
                config.server.host, config.server.port
            )
        })?;
    let addr = listener.local_addr()?;

    tracing::info!("User service listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    use crate::testing::token_keys;

    #[tokio::test]
    async fn test_ping_route() {
        let app = router(AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            &token_keys(),
            Duration::hours(1),
        ));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"pong"}"#);
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer(&["http://localhost:3001".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
