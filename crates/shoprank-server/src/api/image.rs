use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use shoprank_scraper::ProxyError;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const CACHE_POLICY: &str = "s-maxage=86400, stale-while-revalidate=604800";

#[derive(Debug, Deserialize)]
pub(super) struct ImageQuery {
    url: Option<String>,
}

pub(super) async fn proxy_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "url parameter is required",
        ));
    };

    let image = state
        .image_proxy
        .fetch(&url)
        .await
        .map_err(|e| map_proxy_error(req_id.0.clone(), &e))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, CACHE_POLICY.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}

fn map_proxy_error(request_id: String, error: &ProxyError) -> ApiError {
    match error {
        ProxyError::InvalidUrl(_) => ApiError::new(request_id, "validation_error", error.to_string()),
        ProxyError::ForbiddenHost(host) => {
            tracing::info!(host = %host, "image proxy refused host");
            ApiError::new(request_id, "forbidden", error.to_string())
        }
        ProxyError::UpstreamStatus { status } => {
            let status = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| !s.is_redirection())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            ApiError::new(request_id, "upstream_error", "fetch failed").with_status(status)
        }
        ProxyError::TooLarge { .. } => {
            ApiError::new(request_id, "upstream_error", error.to_string())
                .with_status(StatusCode::BAD_GATEWAY)
        }
        ProxyError::Timeout => ApiError::new(request_id, "upstream_error", error.to_string())
            .with_status(StatusCode::GATEWAY_TIMEOUT),
        ProxyError::Http(_) => {
            tracing::warn!(error = %error, "image fetch failed");
            ApiError::new(request_id, "upstream_error", "fetch failed")
                .with_status(StatusCode::BAD_GATEWAY)
        }
    }
}
