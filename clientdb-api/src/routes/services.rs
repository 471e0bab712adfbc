/// Service endpoints
///
/// - `GET /api/services` - List services (with `X-Total-Count`)
/// - `GET /api/services/:id` - Get a service with its clients resolved
/// - `POST /api/services` - Create a service
/// - `PUT|PATCH /api/services/:id` - Update a service
/// - `POST /api/services/:id/clients` - Attach a client to a service

use crate::{app::AppState, error::ApiResult, routes::ListResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use clientdb_shared::{
    models::{CreateService, ServiceDetail, UpdateService},
    query::ListQuery,
};
use serde::Deserialize;

/// Attach client request
#[derive(Debug, Deserialize)]
pub struct AttachClientRequest {
    #[serde(default)]
    pub client_id: String,
}

pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ListResponse<ServiceDetail>> {
    let page = state.data.list_services(&query).await?;
    Ok(page.into())
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServiceDetail>> {
    Ok(Json(state.data.get_service(&id).await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    payload: Result<Json<CreateService>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ServiceDetail>)> {
    let Json(input) = payload?;
    let service = state.data.create_service(input).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateService>, JsonRejection>,
) -> ApiResult<Json<ServiceDetail>> {
    let Json(input) = payload?;
    Ok(Json(state.data.update_service(&id, input).await?))
}

pub async fn attach_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AttachClientRequest>, JsonRejection>,
) -> ApiResult<Json<ServiceDetail>> {
    let Json(request) = payload?;
    Ok(Json(state.data.attach_client(&id, &request.client_id).await?))
}
