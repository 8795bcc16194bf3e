mod analysis;
mod export;
mod image;
mod params;
mod rankings;
mod status;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use shoprank_catalog::{AggregationPipeline, PipelineError};
use shoprank_core::{AppConfig, ProductRecord};
use shoprank_scraper::ImageProxy;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<AggregationPipeline>,
    pub image_proxy: Arc<ImageProxy>,
}

/// Error envelope. Mirrors the success envelope's `success`/`products`
/// fields so clients can branch on `success` alone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    success: bool,
    pub error: String,
    pub code: String,
    products: Vec<ProductRecord>,
    pub request_id: String,
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
            products: Vec::new(),
            request_id: request_id.into(),
            status: None,
        }
    }

    /// Overrides the status derived from `code`; used to relay upstream
    /// statuses through the image proxy.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    fn status(&self) -> StatusCode {
        if let Some(status) = self.status {
            return status;
        }
        match self.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "forbidden" => StatusCode::FORBIDDEN,
            "not_found" => StatusCode::NOT_FOUND,
            "method_not_allowed" => StatusCode::METHOD_NOT_ALLOWED,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::Unavailable { platform, .. } => {
            tracing::info!(platform, error = %error, "strict mode refused synthetic data");
            ApiError::new(request_id, "unavailable", error.to_string())
        }
        PipelineError::Unregistered(_) => {
            tracing::error!(error = %error, "platform missing from registry");
            ApiError::new(request_id, "internal_error", error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(status::health))
        .route("/api/status", get(status::status))
        .route("/api/platforms", get(status::platforms))
        .route("/api/rankings", get(rankings::all_platforms))
        .route("/api/rankings/{platform}", get(rankings::one_platform))
        .route("/api/naver", get(rankings::naver))
        .route("/api/coupang", get(rankings::coupang))
        .route("/api/other-platforms", get(rankings::other_platforms))
        .route("/api/export", get(export::export_csv))
        .route("/api/image", get(image::proxy_image))
        .route("/api/analysis", post(analysis::analyze_product))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "no such endpoint")
}

async fn method_not_allowed(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "method_not_allowed", "method not allowed")
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "handler panicked");
    ApiError::new("unknown", "internal_error", detail).into_response()
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
