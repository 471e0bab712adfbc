/// Liveness and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /        -> "I'm alive"
/// GET /health
/// ```
///
/// `/health` answers 503 `service_unavailable` when PostgreSQL does not
/// respond.
///
/// # Health Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "postgres",
///   "database": "connected"
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use clientdb_shared::db::pool::{pool_stats, PoolStats};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Storage backend (`memory` or `postgres`)
    pub storage: String,

    /// Database status, PostgreSQL only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Pool usage, PostgreSQL only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStatsResponse>,
}

/// Connection pool usage
#[derive(Debug, Serialize, Deserialize)]
pub struct PoolStatsResponse {
    pub active_connections: usize,
    pub idle_connections: usize,
}

impl From<PoolStats> for PoolStatsResponse {
    fn from(stats: PoolStats) -> Self {
        Self {
            active_connections: stats.active_connections,
            idle_connections: stats.idle_connections,
        }
    }
}

/// Liveness probe
pub async fn alive() -> &'static str {
    "I'm alive"
}

/// Health check handler
///
/// Returns service health status including database connectivity when the
/// PostgreSQL backend is in use. A failed database ping is a 503.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let store = state.data.store();

    let database = match store.pool() {
        Some(_) => {
            if let Err(err) = store.ping().await {
                tracing::warn!(error = %err, "Database health check failed");
                return Err(ApiError::ServiceUnavailable(
                    "database is unreachable".to_string(),
                ));
            }
            Some("connected".to_string())
        }
        None => None,
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: store.kind().to_string(),
        database,
        pool: store.pool().map(|pool| pool_stats(pool).into()),
    }))
}
