//! Configuration management for the API server
//!
//! This module loads configuration from environment variables and provides
//! a type-safe configuration struct.
//!
//! # Environment Variables
//!
//! - `CLIENTDB_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `CLIENTDB_API_PORT`: Port to bind to (default: 8080)
//! - `CLIENTDB_CORS_ORIGINS`: Comma separated allowed origins (default: *)
//! - `CLIENTDB_PRODUCTION`: Enables HSTS (default: false)
//! - `CLIENTDB_DATABASE_URL`: PostgreSQL connection string; unset uses the in-memory store
//! - `CLIENTDB_DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `CLIENTDB_SEED`: Load seed data into an empty store (default: true)
//! - `CLIENTDB_LOG_LEVEL`: Log level when `RUST_LOG` is unset (default: info)
//! - `CLIENTDB_LOG_FORMAT`: `text` or `json` (default: text)
//!
//! # Example
//!
//! ```no_run
//! use clientdb_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration, absent for the in-memory store
    pub database: Option<DatabaseConfig>,

    /// Load seed data into an empty store at startup
    pub seed: bool,

    /// Default log level
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

fn parse_bool(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be a boolean, got {:?}", name, other),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("CLIENTDB_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("CLIENTDB_API_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("CLIENTDB_API_PORT is not a valid port: {:?}", v))?,
            None => 8080,
        };

        let cors_origins = var("CLIENTDB_CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = match var("CLIENTDB_PRODUCTION") {
            Some(v) => parse_bool("CLIENTDB_PRODUCTION", &v)?,
            None => false,
        };

        let max_connections = match var("CLIENTDB_DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.trim().parse::<u32>().with_context(|| {
                format!("CLIENTDB_DATABASE_MAX_CONNECTIONS is not a number: {:?}", v)
            })?,
            None => 10,
        };
        let database = var("CLIENTDB_DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections,
        });

        let seed = match var("CLIENTDB_SEED") {
            Some(v) => parse_bool("CLIENTDB_SEED", &v)?,
            None => true,
        };

        let log_level = var("CLIENTDB_LOG_LEVEL")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_else(|| "info".to_string());

        let log_json = match var("CLIENTDB_LOG_FORMAT").map(|v| v.trim().to_lowercase()) {
            Some(format) if format == "json" => true,
            Some(format) if format == "text" => false,
            Some(other) => anyhow::bail!("CLIENTDB_LOG_FORMAT must be text or json, got {:?}", other),
            None => false,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database,
            seed,
            log_level,
            log_json,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// True when any origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
