//! Cookbook endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::read_json;
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use larder_core::{Checksum, CookbookManifest, FileKind, parts_by_type, to_manifest};
use serde::Serialize;
use std::collections::BTreeMap;

/// One cookbook in a listing.
#[derive(Debug, Serialize)]
pub struct CookbookEntry {
    pub url: String,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Serialize)]
pub struct VersionEntry {
    pub version: String,
    pub url: String,
}

/// One kind of file in the grouping view.
#[derive(Debug, Serialize)]
pub struct PartResponse {
    pub kind: FileKind,
    pub label: &'static str,
    pub count: usize,
    pub files: Vec<PartFile>,
}

#[derive(Debug, Serialize)]
pub struct PartFile {
    pub name: String,
    pub path: String,
    pub specificity: String,
    pub checksum: String,
}

fn cookbook_entry(
    state: &AppState,
    headers: &HeaderMap,
    name: &str,
    versions: &[String],
) -> CookbookEntry {
    let urls = state.urls(headers);
    CookbookEntry {
        url: urls.cookbook(name),
        versions: versions
            .iter()
            .map(|version| VersionEntry {
                version: version.clone(),
                url: urls.cookbook_version(name, version),
            })
            .collect(),
    }
}

/// GET /cookbooks
pub async fn list_cookbooks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<BTreeMap<String, CookbookEntry>>> {
    let summaries = state.metadata.list_cookbooks().await?;

    Ok(Json(
        summaries
            .iter()
            .map(|s| {
                (
                    s.name.clone(),
                    cookbook_entry(&state, &headers, &s.name, &s.versions),
                )
            })
            .collect(),
    ))
}

/// GET /cookbooks/{name}
pub async fn get_cookbook_versions(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<BTreeMap<String, CookbookEntry>>> {
    let versions = state.metadata.list_versions(&name).await?;
    if versions.is_empty() {
        return Err(ApiError::NotFound(format!("cookbook {name}")));
    }

    let entry = cookbook_entry(&state, &headers, &name, &versions);
    Ok(Json(BTreeMap::from([(name, entry)])))
}

/// GET /cookbooks/{name}/{version}
pub async fn get_cookbook(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<CookbookManifest>> {
    let cookbook = state
        .metadata
        .get_cookbook(&name, &version)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("cookbook {name} {version}")))?;

    let urls = state.urls(&headers);
    Ok(Json(to_manifest(&cookbook, Some(&urls))))
}

/// PUT /cookbooks/{name}/{version} - Create or update a cookbook version.
///
/// The body is a full manifest. Every referenced checksum must already be
/// uploaded, otherwise nothing is written.
#[tracing::instrument(skip_all, fields(cookbook = %name, version = %version))]
pub async fn put_cookbook(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
    req: Request,
) -> ApiResult<Json<CookbookManifest>> {
    let headers = req.headers().clone();
    let result = upload_cookbook(&state, &name, &version, req).await;

    match result {
        Ok(cookbook) => {
            metrics::COOKBOOK_UPLOADS.inc();
            let urls = state.urls(&headers);
            Ok(Json(to_manifest(&cookbook, Some(&urls))))
        }
        Err(err) => {
            metrics::record_upload_error(err.code());
            tracing::info!(error = %err, "Cookbook upload rejected");
            Err(err)
        }
    }
}

async fn upload_cookbook(
    state: &AppState,
    name: &str,
    version: &str,
    req: Request,
) -> ApiResult<larder_core::Cookbook> {
    let manifest: CookbookManifest = read_json(req, state.config.server.max_body_size).await?;

    if manifest.cookbook_name != name || manifest.version != version {
        return Err(ApiError::Unprocessable(format!(
            "manifest describes {} {} but was sent to {name} {version}",
            manifest.cookbook_name, manifest.version
        )));
    }

    let timer = metrics::COOKBOOK_MERGE_DURATION.start_timer();
    let merged = state.metadata.upsert_from_manifest(&manifest).await;
    timer.observe_duration();

    Ok(merged?)
}

/// DELETE /cookbooks/{name}/{version}
#[tracing::instrument(skip_all, fields(cookbook = %name, version = %version))]
pub async fn delete_cookbook(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<CookbookManifest>> {
    let cookbook = state.metadata.delete_cookbook(&name, &version).await?;
    tracing::info!("Cookbook version deleted");

    let urls = state.urls(&headers);
    Ok(Json(to_manifest(&cookbook, Some(&urls))))
}

/// GET /cookbooks/{name}/{version}/files/{checksum} - Stream a file body.
#[tracing::instrument(skip_all, fields(cookbook = %name, version = %version, checksum = %checksum))]
pub async fn get_cookbook_file(
    State(state): State<AppState>,
    Path((name, version, checksum)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let not_found =
        || ApiError::NotFound(format!("file {checksum} in cookbook {name} {version}"));

    let checksum = Checksum::parse(&checksum).map_err(|_| not_found())?;
    if !state
        .metadata
        .cookbook_references_checksum(&name, &version, &checksum)
        .await?
    {
        return Err(not_found());
    }

    let meta = state.storage.head(&checksum).await?;
    let stream = state
        .storage
        .get_stream(&checksum)
        .await?
        .map(|result| result.map_err(|e| std::io::Error::other(e.to_string())));

    metrics::COOKBOOK_FILE_DOWNLOADS.inc();

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/octet-stream".to_string()),
            (CONTENT_LENGTH, meta.size.to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// GET /cookbooks/{name}/{version}/parts - Files grouped by kind.
pub async fn get_cookbook_parts(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult<Json<Vec<PartResponse>>> {
    let cookbook = state
        .metadata
        .get_cookbook(&name, &version)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("cookbook {name} {version}")))?;

    let parts = parts_by_type(&cookbook)
        .map(|part| PartResponse {
            kind: part.kind,
            label: part.label(),
            count: part.count(),
            files: part
                .files
                .iter()
                .map(|file| PartFile {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    specificity: file.specificity.clone(),
                    checksum: file.checksum.to_string(),
                })
                .collect(),
        })
        .collect();

    Ok(Json(parts))
}
