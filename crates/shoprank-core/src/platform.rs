//! Supported marketplaces and their storefront conventions.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A marketplace the service can rank products for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "naver")]
    Naver,
    #[serde(rename = "coupang")]
    Coupang,
    #[serde(rename = "gmarket")]
    Gmarket,
    #[serde(rename = "auction")]
    Auction,
    #[serde(rename = "interpark")]
    Interpark,
    #[serde(rename = "11st")]
    Elevenst,
    #[serde(rename = "lotte")]
    Lotte,
    #[serde(rename = "ssg")]
    Ssg,
}

impl Platform {
    /// Every supported platform, in the order the aggregate view interleaves them.
    pub const ALL: [Platform; 8] = [
        Platform::Naver,
        Platform::Coupang,
        Platform::Gmarket,
        Platform::Auction,
        Platform::Interpark,
        Platform::Elevenst,
        Platform::Lotte,
        Platform::Ssg,
    ];

    /// Stable identifier used in URLs, query strings and JSON.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Platform::Naver => "naver",
            Platform::Coupang => "coupang",
            Platform::Gmarket => "gmarket",
            Platform::Auction => "auction",
            Platform::Interpark => "interpark",
            Platform::Elevenst => "11st",
            Platform::Lotte => "lotte",
            Platform::Ssg => "ssg",
        }
    }

    /// Human-readable marketplace name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Naver => "네이버쇼핑",
            Platform::Coupang => "쿠팡",
            Platform::Gmarket => "지마켓",
            Platform::Auction => "옥션",
            Platform::Interpark => "인터파크",
            Platform::Elevenst => "11번가",
            Platform::Lotte => "롯데온",
            Platform::Ssg => "SSG",
        }
    }

    /// Storefront name used for `mallName` when the source does not provide one.
    #[must_use]
    pub fn default_mall(self) -> &'static str {
        self.display_name()
    }

    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Platform::Naver => "https://search.shopping.naver.com",
            Platform::Coupang => "https://www.coupang.com",
            Platform::Gmarket => "https://www.gmarket.co.kr",
            Platform::Auction => "https://www.auction.co.kr",
            Platform::Interpark => "https://www.interpark.com",
            Platform::Elevenst => "https://www.11st.co.kr",
            Platform::Lotte => "https://www.lotteon.com",
            Platform::Ssg => "https://www.ssg.com",
        }
    }

    /// Product detail page for a marketplace product id.
    #[must_use]
    pub fn product_url(self, product_id: &str) -> String {
        let base = self.base_url();
        match self {
            Platform::Naver => format!("{base}/catalog/{product_id}"),
            Platform::Coupang => format!("{base}/vp/products/{product_id}"),
            Platform::Elevenst => format!("{base}/products/{product_id}"),
            Platform::Lotte => format!("{base}/p/product/{product_id}"),
            Platform::Ssg => format!("{base}/item/itemView.ssg?itemId={product_id}"),
            Platform::Gmarket | Platform::Auction | Platform::Interpark => {
                format!("{base}/item/{product_id}")
            }
        }
    }

    /// Search results page for a free-text term.
    #[must_use]
    pub fn search_url(self, term: &str) -> String {
        let base = self.base_url();
        let q = utf8_percent_encode(term, NON_ALPHANUMERIC);
        match self {
            Platform::Naver => format!("{base}/search/all?query={q}"),
            Platform::Coupang => format!("{base}/np/search?q={q}"),
            Platform::Gmarket => format!("{base}/n/search?keyword={q}"),
            Platform::Auction => format!("{base}/n/search?keyword={q}"),
            Platform::Interpark => format!("{base}/search?q={q}"),
            Platform::Elevenst => format!("{base}/search?kwd={q}"),
            Platform::Lotte => format!("{base}/search/search/search.ecn?q={q}"),
            Platform::Ssg => format!("{base}/search.ssg?query={q}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == needle || p.display_name() == s.trim())
            .ok_or_else(|| CoreError::UnknownPlatform(s.to_string()))
    }
}
