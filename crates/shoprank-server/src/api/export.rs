//! CSV download of a ranking.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use chrono::{NaiveDate, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use shoprank_core::{ProductRecord, SortKey};

use crate::middleware::RequestId;

use super::params::{RankingQuery, Scope};
use super::rankings::{accept_query, category_label, run_ranking};
use super::{ApiError, AppState};

/// Lets spreadsheet tools detect UTF-8.
const BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 12] = [
    "순위",
    "상품명",
    "카테고리",
    "브랜드",
    "가격",
    "정가",
    "할인율(%)",
    "평점",
    "리뷰수",
    "판매처",
    "플랫폼",
    "링크",
];

pub(super) async fn export_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = accept_query(&req_id, query)?;
    let scope = query
        .scope(Scope::All)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    let (request, output) = run_ranking(&state, &req_id, scope, query).await?;

    let body = render_csv(&output.products).map_err(|e| {
        tracing::error!(error = %e, "csv rendering failed");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to render csv")
    })?;
    let filename = export_filename(category_label(&request), request.sort, Utc::now().date_naive());
    tracing::debug!(rows = output.products.len(), filename = %filename, "csv export rendered");

    let encoded = utf8_percent_encode(&filename, NON_ALPHANUMERIC).to_string();
    let disposition = format!("attachment; filename=\"{encoded}\"; filename*=UTF-8''{encoded}");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

fn export_filename(category: &str, sort: SortKey, date: NaiveDate) -> String {
    format!("쇼핑순위_{category}_{sort}_{}.csv", date.format("%Y-%m-%d"))
}

fn render_csv(products: &[ProductRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(BOM.to_vec());
    writer.write_record(HEADER)?;
    for product in products {
        writer.write_record([
            product.rank.to_string(),
            product.title.clone(),
            product.category.label().to_string(),
            product.brand.clone().unwrap_or_default(),
            product.price.to_string(),
            product.original_price.to_string(),
            product.discount_rate.to_string(),
            format!("{:.1}", product.rating),
            product.review_count.to_string(),
            product.mall_name.clone(),
            product.platform.display_name().to_string(),
            product.link.clone(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
