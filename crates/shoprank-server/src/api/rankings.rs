use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shoprank_catalog::{DataSource, PipelineOutput, PipelineRequest};
use shoprank_core::{Platform, ProductRecord, SortKey};

use crate::middleware::RequestId;

use super::params::{RankingQuery, Scope};
use super::{map_pipeline_error, ApiError, AppState};

/// Success envelope for every ranking endpoint.
///
/// `success` only says the request was served. Whether the records are live
/// is carried by `source` and `note`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankingEnvelope {
    success: bool,
    total: usize,
    count: usize,
    products: Vec<ProductRecord>,
    platform: &'static str,
    platform_name: &'static str,
    category: &'static str,
    sort: SortKey,
    source: DataSource,
    note: Option<String>,
    last_update: DateTime<Utc>,
    request_id: String,
}

impl RankingEnvelope {
    fn new(
        scope: Scope,
        request: &PipelineRequest,
        output: PipelineOutput,
        request_id: String,
    ) -> Self {
        let note = (!output.notes.is_empty()).then(|| output.notes.join("; "));
        Self {
            success: true,
            total: output.total,
            count: output.products.len(),
            products: output.products,
            platform: scope.id(),
            platform_name: scope.display_name(),
            category: category_label(request),
            sort: request.sort,
            source: output.source,
            note,
            last_update: Utc::now(),
            request_id,
        }
    }
}

pub(super) fn category_label(request: &PipelineRequest) -> &'static str {
    request.category.map_or("전체", |c| c.label())
}

type RankingResult = Result<Json<RankingEnvelope>, ApiError>;

pub(super) fn accept_query(
    req_id: &RequestId,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> Result<RankingQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text()))
}

/// Resolves parameters against `scope` and runs the matching pipeline entry.
pub(super) async fn run_ranking(
    state: &AppState,
    req_id: &RequestId,
    scope: Scope,
    query: RankingQuery,
) -> Result<(PipelineRequest, PipelineOutput), ApiError> {
    let request = query
        .into_request(scope, state.config.fallback_mode)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    tracing::debug!(
        request_id = %req_id.0,
        platform = scope.id(),
        sort = %request.sort,
        offset = request.offset,
        count = request.count,
        "running ranking pipeline"
    );

    let result = match scope {
        Scope::All => state.pipeline.run_all(&request).await,
        Scope::One(_) => state.pipeline.run(&request).await,
    };
    let output = result.map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok((request, output))
}

async fn respond(state: &AppState, req_id: RequestId, scope: Scope, query: RankingQuery) -> RankingResult {
    let (request, output) = run_ranking(state, &req_id, scope, query).await?;
    Ok(Json(RankingEnvelope::new(scope, &request, output, req_id.0)))
}

pub(super) async fn all_platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> RankingResult {
    let query = accept_query(&req_id, query)?;
    let scope = query
        .scope(Scope::All)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    respond(&state, req_id, scope, query).await
}

pub(super) async fn one_platform(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(platform): Path<String>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> RankingResult {
    let query = accept_query(&req_id, query)?;
    let scope = Scope::parse(&platform)
        .map_err(|message| ApiError::new(req_id.0.clone(), "not_found", message))?;
    respond(&state, req_id, scope, query).await
}

pub(super) async fn naver(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> RankingResult {
    let query = accept_query(&req_id, query)?;
    respond(&state, req_id, Scope::One(Platform::Naver), query).await
}

pub(super) async fn coupang(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> RankingResult {
    let query = accept_query(&req_id, query)?;
    respond(&state, req_id, Scope::One(Platform::Coupang), query).await
}

/// Synthetic-only marketplaces, selected by `platform` (default Gmarket).
pub(super) async fn other_platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> RankingResult {
    let query = accept_query(&req_id, query)?;
    let scope = query
        .scope(Scope::One(Platform::Gmarket))
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    respond(&state, req_id, scope, query).await
}
