//! Application state and router builder
//!
//! This module defines the shared application state and provides
//! a function to build the Axum router with all routes and middleware.
//!
//! # Example
//!
//! ```no_run
//! use clientdb_api::{app::AppState, config::Config};
//! use clientdb_shared::db::StorageBackend;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let state = AppState::new(StorageBackend::in_memory(), config);
//! let app = clientdb_api::app::build_router(state);
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use clientdb_shared::{api::ClientDb, db::StorageBackend};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Data access API
    pub data: ClientDb,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: StorageBackend, config: Config) -> Self {
        Self {
            data: ClientDb::new(store),
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let expose = [HeaderName::from_static(routes::TOTAL_COUNT_HEADER)];

    if config.allows_any_origin() {
        // Development mode: any origin, no credentials
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(expose);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers(expose)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                          # Liveness ("I'm alive")
/// ├── GET /health                    # Health check with storage status
/// └── /api/
///     ├── /clients                   # GET list, POST create
///     │   └── /:id                   # GET, PUT, PATCH
///     ├── /contacts                  # GET list, POST create
///     │   └── /:id                   # GET, PUT, PATCH
///     └── /services                  # GET list, POST create
///         ├── /:id                   # GET, PUT, PATCH
///         └── /:id/clients           # POST attach client
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer, exposes `X-Total-Count`)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/", get(routes::health::alive))
        .route("/health", get(routes::health::health_check));

    let api_routes = Router::new()
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/clients/:id",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .patch(routes::clients::update_client),
        )
        .route(
            "/contacts",
            get(routes::contacts::list_contacts).post(routes::contacts::create_contact),
        )
        .route(
            "/contacts/:id",
            get(routes::contacts::get_contact)
                .put(routes::contacts::update_contact)
                .patch(routes::contacts::update_contact),
        )
        .route(
            "/services",
            get(routes::services::list_services).post(routes::services::create_service),
        )
        .route(
            "/services/:id",
            get(routes::services::get_service)
                .put(routes::services::update_service)
                .patch(routes::services::update_service),
        )
        .route(
            "/services/:id/clients",
            post(routes::services::attach_client),
        );

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
