//! # clientdb API Server
//!
//! REST backend for the clientdb admin front-end: clients, contacts and
//! services, with client references expanded inline.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - List/get/create/update endpoints for each collection under `/api`
//! - An in-memory store by default, PostgreSQL when `CLIENTDB_DATABASE_URL` is set
//! - Seed data loaded into an empty store at startup
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p clientdb-api
//! ```

use anyhow::Context;
use clientdb_api::{
    app::{build_router, AppState},
    config::Config,
};
use clientdb_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, PoolConfig},
    StorageBackend,
};
use clientdb_shared::seed;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "clientdb_api={level},clientdb_shared={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with((!config.log_json).then(tracing_subscriber::fmt::layer))
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    tracing::info!(
        "clientdb API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = match &config.database {
        Some(database) => {
            ensure_database_exists(&database.url)
                .await
                .context("failed to create database")?;

            let pool = create_pool(PoolConfig {
                max_connections: database.max_connections,
                ..PoolConfig::new(database.url.clone())
            })
            .await
            .context("failed to connect to database")?;

            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;

            StorageBackend::postgres(pool)
        }
        None => {
            tracing::info!("CLIENTDB_DATABASE_URL not set, using in-memory store");
            StorageBackend::in_memory()
        }
    };

    if config.seed {
        seed::load_bundled(&store)
            .await
            .context("failed to load seed data")?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(store.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    tracing::info!(backend = store.kind(), "Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = store.pool() {
        close_pool(pool).await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
