use axum::{extract::rejection::JsonRejection, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shoprank_catalog::{analyze, AnalysisReport, AnalysisRequest};

use crate::middleware::RequestId;

use super::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalysisEnvelope {
    success: bool,
    product: String,
    rank: Option<u32>,
    platform: Option<String>,
    analysis: AnalysisReport,
    generated_at: DateTime<Utc>,
    request_id: String,
}

pub(super) async fn analyze_product(
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisEnvelope>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;
    let analysis = analyze(&request)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let product = request.product.as_deref().map(str::trim).unwrap_or_default().to_string();
    tracing::debug!(request_id = %req_id.0, product = %product, rank = ?request.rank, "analysis generated");

    Ok(Json(AnalysisEnvelope {
        success: true,
        product,
        rank: request.rank,
        platform: request.platform,
        analysis,
        generated_at: Utc::now(),
        request_id: req_id.0,
    }))
}
