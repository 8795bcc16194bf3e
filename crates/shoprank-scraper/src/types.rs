//! Upstream response shapes and the platform-neutral [`RawItem`].
//!
//! ## Naver shopping search (`/v1/search/shop.json`)
//!
//! Prices (`lprice`, `hprice`) arrive as decimal strings; `hprice` is `""`
//! when the listing has no upper bound. Titles carry `<b>` highlight markup
//! around the query terms. `category1` holds composite labels such as
//! `"디지털/가전"` or `"화장품/미용"`.
//!
//! ## Coupang Partners product search
//!
//! Wrapped in `{ rCode, rMessage, data: { landingUrl, productData } }`. Any
//! `rCode` other than `"0"` is an error even with HTTP 200. `productId` and
//! `productPrice` are numbers; some gateways have been seen to return them as
//! strings, so both are accepted.

use serde::Deserialize;

use crate::parse::parse_price;

/// A JSON scalar that may be either a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Interprets the value as whole KRW. Negative, empty, or unparseable
    /// values yield `None`.
    #[must_use]
    pub fn as_price(&self) -> Option<u64> {
        match self {
            Scalar::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let whole = v.round() as u64;
                        whole
                    })
            }),
            Scalar::Text(s) => parse_price(s),
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// Top-level response from the Naver shopping search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverSearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub lprice: Option<Scalar>,
    #[serde(default)]
    pub hprice: Option<Scalar>,
    #[serde(default)]
    pub mall_name: Option<String>,
    #[serde(default)]
    pub product_id: Option<Scalar>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub maker: Option<String>,
    #[serde(default)]
    pub category1: Option<String>,
    #[serde(default)]
    pub category2: Option<String>,
}

/// Body returned by Naver on 4xx responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverErrorBody {
    pub error_code: String,
    #[serde(default)]
    pub error_message: String,
}

#[derive(Debug, Deserialize)]
pub struct CoupangSearchResponse {
    #[serde(rename = "rCode")]
    pub r_code: String,
    #[serde(rename = "rMessage", default)]
    pub r_message: String,
    #[serde(default)]
    pub data: Option<CoupangSearchData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupangSearchData {
    #[serde(default)]
    pub landing_url: Option<String>,
    #[serde(default)]
    pub product_data: Vec<CoupangProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupangProduct {
    #[serde(default)]
    pub product_id: Option<Scalar>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_price: Option<Scalar>,
    #[serde(default)]
    pub original_price: Option<Scalar>,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_rocket: Option<bool>,
    #[serde(default)]
    pub is_free_shipping: Option<bool>,
}

/// Platform-neutral item handed to the normalizer.
///
/// Every field is optional in spirit; the normalizer supplies defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub low_price: Option<u64>,
    pub high_price: Option<u64>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub mall_name: Option<String>,
    pub category_hint: Option<String>,
    pub brand: Option<String>,
    pub product_id: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub delivery_info: Option<String>,
    pub free_shipping: Option<bool>,
    pub is_rocket: Option<bool>,
    pub vendor_name: Option<String>,
}

impl RawItem {
    /// Identity used to drop duplicates across search terms.
    #[must_use]
    pub fn dedupe_key(&self) -> String {
        self.product_id
            .clone()
            .or_else(|| self.link.clone())
            .unwrap_or_else(|| self.title.clone())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<NaverItem> for RawItem {
    fn from(item: NaverItem) -> Self {
        let brand = non_empty(item.brand).or_else(|| non_empty(item.maker));
        let category_hint = non_empty(item.category1).or_else(|| non_empty(item.category2));
        RawItem {
            title: item.title,
            low_price: item.lprice.as_ref().and_then(Scalar::as_price),
            high_price: item.hprice.as_ref().and_then(Scalar::as_price),
            image: non_empty(item.image),
            link: non_empty(item.link),
            mall_name: non_empty(item.mall_name),
            category_hint,
            brand,
            product_id: item.product_id.map(Scalar::into_text),
            ..RawItem::default()
        }
    }
}

impl From<CoupangProduct> for RawItem {
    fn from(item: CoupangProduct) -> Self {
        let rocket = item.is_rocket.unwrap_or(false);
        RawItem {
            title: item.product_name,
            low_price: item.product_price.as_ref().and_then(Scalar::as_price),
            high_price: item.original_price.as_ref().and_then(Scalar::as_price),
            image: non_empty(item.product_image),
            link: non_empty(item.product_url),
            category_hint: non_empty(item.category_name),
            product_id: item.product_id.map(Scalar::into_text),
            delivery_info: rocket.then(|| "로켓배송".to_string()),
            free_shipping: item.is_free_shipping,
            is_rocket: item.is_rocket,
            ..RawItem::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naver_item_accepts_string_prices_and_empty_hprice() {
        let json = r#"{
            "title": "<b>삼성</b> 갤럭시 버즈",
            "link": "https://search.shopping.naver.com/gate.nhn?id=1",
            "image": "https://shopping-phinf.pstatic.net/1.jpg",
            "lprice": "129000",
            "hprice": "",
            "mallName": "네이버",
            "productId": "82736451234",
            "brand": "",
            "maker": "삼성전자",
            "category1": "디지털/가전"
        }"#;
        let item: NaverItem = serde_json::from_str(json).unwrap();
        let raw = RawItem::from(item);
        assert_eq!(raw.low_price, Some(129_000));
        assert_eq!(raw.high_price, None);
        assert_eq!(raw.brand.as_deref(), Some("삼성전자"));
        assert_eq!(raw.product_id.as_deref(), Some("82736451234"));
        assert_eq!(raw.category_hint.as_deref(), Some("디지털/가전"));
    }

    #[test]
    fn coupang_product_accepts_numeric_ids() {
        let json = r#"{
            "productId": 1081242570,
            "productName": "탐사 생수 2L x 12병",
            "productPrice": 6490,
            "productImage": "https://thumbnail6.coupangcdn.com/a.jpg",
            "productUrl": "https://link.coupang.com/re/AFFSDP?pageKey=1081242570",
            "categoryName": "식품",
            "isRocket": true,
            "isFreeShipping": false
        }"#;
        let item: CoupangProduct = serde_json::from_str(json).unwrap();
        let raw = RawItem::from(item);
        assert_eq!(raw.product_id.as_deref(), Some("1081242570"));
        assert_eq!(raw.low_price, Some(6_490));
        assert_eq!(raw.is_rocket, Some(true));
        assert_eq!(raw.delivery_info.as_deref(), Some("로켓배송"));
    }

    #[test]
    fn scalar_price_rejects_negative_numbers() {
        let value: Scalar = serde_json::from_str("-5").unwrap();
        assert_eq!(value.as_price(), None);
    }

    #[test]
    fn dedupe_key_prefers_product_id() {
        let raw = RawItem {
            title: "a".into(),
            link: Some("https://x".into()),
            product_id: Some("9".into()),
            ..RawItem::default()
        };
        assert_eq!(raw.dedupe_key(), "9");
    }
}
