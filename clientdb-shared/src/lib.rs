//! # clientdb Shared Library
//!
//! Records, validation, storage backends and the data access API used by
//! the clientdb API server.
//!
//! ## Module Organization
//!
//! - `models`: Client, Contact and Service records and their inputs
//! - `api`: Data access API with reference expansion
//! - `db`: In-memory and PostgreSQL storage backends
//! - `query`: List filtering, sorting and paging
//! - `seed`: Bundled seed data
//! - `error`: Common error types

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod seed;

/// Current version of the clientdb shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
