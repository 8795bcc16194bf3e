use serde::{Deserialize, Serialize};

use crate::{Category, Platform};

/// Canonical ranked product every source is normalized into.
///
/// Records are built fresh per request, either from an upstream item by the
/// normalizer or fabricated by the synthetic generator, and dropped once the
/// response has been serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// 1-based position within the response.
    pub rank: u32,
    /// Display title with markup removed. Never empty.
    pub title: String,
    /// Sale price in whole KRW.
    pub price: u64,
    /// List price before discount; equal to `price` when there is no discount.
    pub original_price: u64,
    /// Percentage off `original_price`, 0–100.
    pub discount_rate: u8,
    pub image: String,
    /// Product page or search page at the source marketplace.
    pub link: String,
    /// Selling storefront, or the platform's generic storefront name.
    #[serde(alias = "mall")]
    pub mall_name: String,
    pub category: Category,
    pub platform: Platform,
    /// Average review score in [0.0, 5.0], one decimal.
    pub rating: f64,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub free_shipping: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_rocket: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vendor_name: Option<String>,
}

impl ProductRecord {
    /// Popularity score used by the `popularity` sort: `reviewCount × rating`.
    #[must_use]
    pub fn popularity(&self) -> f64 {
        f64::from(self.review_count) * self.rating
    }

    /// Applies resolved pricing to this record.
    pub fn set_pricing(&mut self, pricing: Pricing) {
        self.price = pricing.price;
        self.original_price = pricing.original_price;
        self.discount_rate = pricing.discount_rate;
    }

    /// Returns `true` when the record satisfies the price, discount, and
    /// rating invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.price <= self.original_price
            && self.discount_rate <= 100
            && self.discount_rate == discount_rate(self.price, self.original_price)
            && (0.0..=5.0).contains(&self.rating)
            && !self.title.is_empty()
    }
}

/// Resolved price triple. Construct with [`Pricing::from_bounds`] or
/// [`Pricing::from_list_price`] so the discount always agrees with the prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub price: u64,
    pub original_price: u64,
    pub discount_rate: u8,
}

impl Pricing {
    /// Resolves a sale price from an optional low/high bound pair.
    ///
    /// - both bounds, high above low: low is the price, high the list price
    /// - only a low bound (or high ≤ low): no discount
    /// - only a high bound: treated as the price, no discount
    /// - neither: zero
    ///
    /// Zero bounds are treated as absent.
    #[must_use]
    pub fn from_bounds(low: Option<u64>, high: Option<u64>) -> Self {
        let low = low.filter(|v| *v > 0);
        let high = high.filter(|v| *v > 0);
        match (low, high) {
            (Some(low), Some(high)) if high > low => Self::from_list_price(low, high),
            (Some(price), _) | (None, Some(price)) => Self::flat(price),
            (None, None) => Self::flat(0),
        }
    }

    /// Builds pricing from a sale price and a list price. A list price below
    /// the sale price is raised to it.
    #[must_use]
    pub fn from_list_price(price: u64, original_price: u64) -> Self {
        let original_price = original_price.max(price);
        Self {
            price,
            original_price,
            discount_rate: discount_rate(price, original_price),
        }
    }

    #[must_use]
    pub fn flat(price: u64) -> Self {
        Self {
            price,
            original_price: price,
            discount_rate: 0,
        }
    }
}

/// `round((original - price) / original * 100)`, clamped to 0–100.
///
/// Returns 0 when `original_price` is 0 or not above `price`.
#[must_use]
pub fn discount_rate(price: u64, original_price: u64) -> u8 {
    if original_price == 0 || price >= original_price {
        return 0;
    }
    let off = original_price - price;
    // Integer rounding: (off * 100 + original / 2) / original.
    let pct = (u128::from(off) * 100 + u128::from(original_price) / 2) / u128::from(original_price);
    u8::try_from(pct.min(100)).unwrap_or(100)
}
