//! Request-level options shared by the pipeline and the HTTP layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Ordering applied to a ranked catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the source ranking.
    #[default]
    Rank,
    /// `reviewCount × rating`, highest first.
    Popularity,
    /// Rating, highest first.
    Rating,
    PriceAsc,
    PriceDesc,
    /// Newest first at the upstream; source order locally.
    Recency,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Rank => "rank",
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Recency => "recency",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "rank" | "sim" | "default" => Ok(SortKey::Rank),
            "popularity" | "popular" | "sales" => Ok(SortKey::Popularity),
            "rating" | "recommend" => Ok(SortKey::Rating),
            "price-asc" | "price_asc" | "asc" => Ok(SortKey::PriceAsc),
            "price-desc" | "price_desc" | "dsc" | "desc" => Ok(SortKey::PriceDesc),
            "recency" | "date" | "latest" => Ok(SortKey::Recency),
            _ => Err(CoreError::UnknownSort(s.to_string())),
        }
    }
}

/// What the pipeline does when a platform's upstream credentials are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Serve synthetic data with an explanatory note.
    #[default]
    Lenient,
    /// Refuse with an "unavailable" status instead of substituting data.
    Strict,
}

impl fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackMode::Lenient => f.write_str("lenient"),
            FallbackMode::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for FallbackMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(FallbackMode::Lenient),
            "strict" => Ok(FallbackMode::Strict),
            _ => Err(CoreError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_accepts_upstream_aliases() {
        assert_eq!("sim".parse::<SortKey>(), Ok(SortKey::Rank));
        assert_eq!("dsc".parse::<SortKey>(), Ok(SortKey::PriceDesc));
        assert_eq!("date".parse::<SortKey>(), Ok(SortKey::Recency));
        assert_eq!("Popularity".parse::<SortKey>(), Ok(SortKey::Popularity));
    }

    #[test]
    fn sort_key_rejects_unknown() {
        assert!(matches!(
            "cheapest".parse::<SortKey>(),
            Err(CoreError::UnknownSort(_))
        ));
    }

    #[test]
    fn fallback_mode_parses() {
        assert_eq!("STRICT".parse::<FallbackMode>(), Ok(FallbackMode::Strict));
        assert!("maybe".parse::<FallbackMode>().is_err());
    }
}
