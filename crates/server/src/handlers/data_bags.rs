//! Data bag endpoints.
//!
//! Item bodies are stored and returned verbatim; the only structure the server
//! relies on is the item's `id`.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{raw_json, read_json, read_json_document};
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use larder_core::data_bag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Create data bag request.
#[derive(Debug, Deserialize)]
pub struct CreateDataBagRequest {
    #[serde(default)]
    pub name: String,
}

/// Created resource response.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub uri: String,
}

/// Deleted data bag response.
#[derive(Debug, Serialize)]
pub struct DeletedDataBagResponse {
    pub name: String,
    pub json_class: &'static str,
    pub chef_type: &'static str,
}

/// GET /data
pub async fn list_data_bags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let urls = state.urls(&headers);
    let bags = state.metadata.list_bags().await?;

    Ok(Json(
        bags.into_iter()
            .map(|bag| {
                let url = urls.data_bag(&bag.name);
                (bag.name, url)
            })
            .collect(),
    ))
}

/// POST /data
#[tracing::instrument(skip_all)]
pub async fn create_data_bag(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let urls = state.urls(req.headers());
    let body: CreateDataBagRequest = read_json(req, state.config.server.max_body_size).await?;
    data_bag::validate_name(&body.name)?;

    let bag = state.metadata.create_bag(&body.name).await?;
    tracing::info!(bag = %bag.name, "Data bag created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            uri: urls.data_bag(&bag.name),
        }),
    ))
}

/// GET /data/{bag}
pub async fn get_data_bag(
    State(state): State<AppState>,
    Path(bag): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    let urls = state.urls(&headers);
    let items = state.metadata.list_items(&bag).await?;

    Ok(Json(
        items
            .into_iter()
            .map(|item| {
                let url = urls.data_bag_item(&bag, &item);
                (item, url)
            })
            .collect(),
    ))
}

/// DELETE /data/{bag} - Delete a bag and all of its items.
#[tracing::instrument(skip(state))]
pub async fn delete_data_bag(
    State(state): State<AppState>,
    Path(bag): Path<String>,
) -> ApiResult<Json<DeletedDataBagResponse>> {
    state.metadata.delete_bag(&bag).await?;
    tracing::info!("Data bag deleted");

    Ok(Json(DeletedDataBagResponse {
        name: bag,
        json_class: "Chef::DataBag",
        chef_type: "data_bag",
    }))
}

/// POST /data/{bag} - Create an item named by the body's `id`.
#[tracing::instrument(skip(state, req))]
pub async fn create_data_bag_item(
    State(state): State<AppState>,
    Path(bag): Path<String>,
    req: Request,
) -> ApiResult<Response> {
    let (raw, body) = read_json_document(req, state.config.server.max_body_size).await?;
    let item = data_bag::item_id(&body)?;

    state.metadata.create_item(&bag, item, &raw).await?;
    metrics::record_item_write("create");
    tracing::debug!(item = %item, "Data bag item created");

    Ok(raw_json(StatusCode::CREATED, raw))
}

/// GET /data/{bag}/{item}
pub async fn get_data_bag_item(
    State(state): State<AppState>,
    Path((bag, item)): Path<(String, String)>,
) -> ApiResult<Response> {
    let row = state
        .metadata
        .get_item(&bag, &item)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("data bag item {bag}/{item}")))?;

    Ok(raw_json(StatusCode::OK, row.raw_data))
}

/// PUT /data/{bag}/{item} - Replace an item; the body must keep its `id`.
#[tracing::instrument(skip(state, req))]
pub async fn update_data_bag_item(
    State(state): State<AppState>,
    Path((bag, item)): Path<(String, String)>,
    req: Request,
) -> ApiResult<Response> {
    let (raw, body) = read_json_document(req, state.config.server.max_body_size).await?;
    data_bag::check_item_id(&item, &body)?;

    state.metadata.update_item(&bag, &item, &raw).await?;
    metrics::record_item_write("update");

    Ok(raw_json(StatusCode::OK, raw))
}

/// DELETE /data/{bag}/{item} - Delete an item and return its last document.
#[tracing::instrument(skip(state))]
pub async fn delete_data_bag_item(
    State(state): State<AppState>,
    Path((bag, item)): Path<(String, String)>,
) -> ApiResult<Response> {
    let row = state.metadata.delete_item(&bag, &item).await?;
    metrics::record_item_write("delete");

    Ok(raw_json(StatusCode::OK, row.raw_data))
}
