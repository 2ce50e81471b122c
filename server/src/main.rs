#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use booking_server::auth::TokenConfig;
use booking_server::config::ServerConfig;
use booking_server::payment::StripeClient;
use booking_server::storage::Database;
use booking_server::{AppState, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: data_directory={}, listen_port={}",
        config.data_directory.display(),
        config.listen_port
    );

    let db = match Database::open(&config.data_directory) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to open store: {e}");
            std::process::exit(1);
        }
    };

    let tokens = match TokenConfig::new_hs256(config.access_token_secret.clone().into_bytes())
        .and_then(|tokens| tokens.with_lifetime(config.access_token_lifetime))
    {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            tracing::error!("Invalid token configuration: {e}");
            std::process::exit(1);
        }
    };

    let payments = match StripeClient::new(
        config.payment_api_base.as_str(),
        config.payment_secret_key.as_str(),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to create payment client: {e}");
            std::process::exit(1);
        }
    };

    let app = router(AppState {
        db,
        tokens,
        payments,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Server error: {e}");
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
