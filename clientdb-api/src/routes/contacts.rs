/// Contact endpoints
///
/// - `GET /api/contacts` - List contacts (with `X-Total-Count`)
/// - `GET /api/contacts/:id` - Get a contact with its clients resolved
/// - `POST /api/contacts` - Create a contact
/// - `PUT|PATCH /api/contacts/:id` - Update a contact

use crate::{app::AppState, error::ApiResult, routes::ListResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use clientdb_shared::{
    models::{ContactDetail, CreateContact, UpdateContact},
    query::ListQuery,
};

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ListResponse<ContactDetail>> {
    let page = state.data.list_contacts(&query).await?;
    Ok(page.into())
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactDetail>> {
    Ok(Json(state.data.get_contact(&id).await?))
}

pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContact>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContactDetail>)> {
    let Json(input) = payload?;
    let contact = state.data.create_contact(input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateContact>, JsonRejection>,
) -> ApiResult<Json<ContactDetail>> {
    let Json(input) = payload?;
    Ok(Json(state.data.update_contact(&id, input).await?))
}
