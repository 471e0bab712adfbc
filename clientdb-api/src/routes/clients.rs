/// Client endpoints
///
/// - `GET /api/clients` - List clients (with `X-Total-Count`)
/// - `GET /api/clients/:id` - Get a client with its contacts and services
/// - `POST /api/clients` - Create a client
/// - `PUT|PATCH /api/clients/:id` - Update a client

use crate::{app::AppState, error::ApiResult, routes::ListResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use clientdb_shared::{
    models::{ClientDetail, CreateClient, UpdateClient},
    query::ListQuery,
};

pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ListResponse<ClientDetail>> {
    let page = state.data.list_clients(&query).await?;
    Ok(page.into())
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClientDetail>> {
    Ok(Json(state.data.get_client(&id).await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<CreateClient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ClientDetail>)> {
    let Json(input) = payload?;
    let client = state.data.create_client(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateClient>, JsonRejection>,
) -> ApiResult<Json<ClientDetail>> {
    let Json(input) = payload?;
    Ok(Json(state.data.update_client(&id, input).await?))
}
