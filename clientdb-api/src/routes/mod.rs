/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness and health check endpoints
/// - `clients`, `contacts`, `services`: Collection endpoints

pub mod clients;
pub mod contacts;
pub mod health;
pub mod services;

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use clientdb_shared::query::Page;
use serde::Serialize;

/// Header carrying the number of matches before paging
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// List response: a JSON array plus `X-Total-Count`
#[derive(Debug)]
pub struct ListResponse<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            total: page.total,
            items: page.items,
        }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (
            [(
                HeaderName::from_static(TOTAL_COUNT_HEADER),
                HeaderValue::from(self.total),
            )],
            Json(self.items),
        )
            .into_response()
    }
}
