//! Normalization from [`RawItem`] to [`shoprank_core::ProductRecord`].
//!
//! Markup and price parsing are delegated to [`crate::parse`] and
//! [`shoprank_core::Pricing`]; this module only decides defaults.

use shoprank_core::{infer_category, Category, KeywordTable, Platform, Pricing, ProductRecord};

use crate::parse::clean_text;
use crate::types::RawItem;

/// Per-item context supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext {
    pub platform: Platform,
    /// 1-based position assigned to the record.
    pub rank: u32,
    pub keywords: &'static KeywordTable,
}

/// Normalizes one upstream item. Never fails: absent fields take documented
/// defaults.
#[must_use]
pub fn normalize_item(raw: RawItem, ctx: &NormalizeContext) -> ProductRecord {
    let platform = ctx.platform;

    let mut title = clean_text(&raw.title);
    if title.is_empty() {
        title = format!("{} 상품 {}", platform.display_name(), ctx.rank);
    }

    let pricing = Pricing::from_bounds(raw.low_price, raw.high_price);

    let category = raw
        .category_hint
        .as_deref()
        .and_then(Category::from_alias)
        .or_else(|| infer_category(&title, ctx.keywords))
        .unwrap_or(Category::Other);

    let link = raw
        .link
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| platform.search_url(&title));

    let mall_name = raw
        .mall_name
        .map(|m| clean_text(&m))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| platform.default_mall().to_string());

    let brand = raw
        .brand
        .map(|b| clean_text(&b))
        .filter(|b| !b.is_empty());

    ProductRecord {
        rank: ctx.rank,
        title,
        price: pricing.price,
        original_price: pricing.original_price,
        discount_rate: pricing.discount_rate,
        image: raw.image.unwrap_or_default(),
        link,
        mall_name,
        category,
        platform,
        rating: normalize_rating(raw.rating),
        review_count: raw.review_count.unwrap_or(0),
        brand,
        product_id: raw.product_id,
        delivery_info: raw.delivery_info,
        free_shipping: raw.free_shipping,
        is_rocket: raw.is_rocket,
        vendor_name: raw.vendor_name,
    }
}

/// Clamps to [0, 5] and rounds to one decimal. Missing or NaN is 0.0.
fn normalize_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r.is_finite() => (r.clamp(0.0, 5.0) * 10.0).round() / 10.0,
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
