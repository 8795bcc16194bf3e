use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shoprank_core::{app_config::preview, FallbackMode};

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HealthResponse {
    success: bool,
    status: &'static str,
    timestamp: DateTime<Utc>,
    request_id: String,
}

pub(super) async fn health(Extension(req_id): Extension<RequestId>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        timestamp: Utc::now(),
        request_id: req_id.0,
    })
}

/// One upstream integration as reported by `/api/status`. Only the public
/// half of a key pair is previewed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpstreamStatus {
    configured: bool,
    key_preview: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusResponse {
    success: bool,
    environment: String,
    fallback_mode: FallbackMode,
    naver: UpstreamStatus,
    coupang: UpstreamStatus,
    timestamp: DateTime<Utc>,
    request_id: String,
}

pub(super) async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<StatusResponse> {
    let config = &state.config;
    Json(StatusResponse {
        success: true,
        environment: config.env.to_string(),
        fallback_mode: config.fallback_mode,
        naver: UpstreamStatus {
            configured: config.naver.is_some(),
            key_preview: config.naver.as_ref().map(|c| preview(&c.client_id)),
            base_url: config.naver_base_url.clone(),
        },
        coupang: UpstreamStatus {
            configured: config.coupang.is_some(),
            key_preview: config.coupang.as_ref().map(|c| preview(&c.access_key)),
            base_url: config.coupang_base_url.clone(),
        },
        timestamp: Utc::now(),
        request_id: req_id.0,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlatformItem {
    id: &'static str,
    name: &'static str,
    upstream: &'static str,
    catalog_size: usize,
    site: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlatformsResponse {
    success: bool,
    platforms: Vec<PlatformItem>,
    request_id: String,
}

pub(super) async fn platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<PlatformsResponse> {
    let platforms = state
        .pipeline
        .registry()
        .iter()
        .map(|d| PlatformItem {
            id: d.platform.id(),
            name: d.platform.display_name(),
            upstream: d.upstream.state(),
            catalog_size: d.catalog_size,
            site: d.platform.base_url(),
        })
        .collect();

    Json(PlatformsResponse {
        success: true,
        platforms,
        request_id: req_id.0,
    })
}
