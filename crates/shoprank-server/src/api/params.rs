//! Ranking query parameters shared by the JSON and CSV endpoints.

use serde::Deserialize;
use shoprank_catalog::PipelineRequest;
use shoprank_core::{Category, FallbackMode, Platform, SortKey};

pub(super) const DEFAULT_LIMIT: usize = 100;
pub(super) const MAX_LIMIT: usize = 200;
pub(super) const MAX_OFFSET: usize = 10_000;

/// Which catalog a ranking request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    All,
    One(Platform),
}

impl Scope {
    pub(super) fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Scope::All);
        }
        trimmed
            .parse::<Platform>()
            .map(Scope::One)
            .map_err(|e| e.to_string())
    }

    pub(super) fn id(self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::One(platform) => platform.id(),
        }
    }

    pub(super) fn display_name(self) -> &'static str {
        match self {
            Scope::All => "전체 플랫폼",
            Scope::One(platform) => platform.display_name(),
        }
    }
}

/// Raw query string. Everything arrives as text so bad values produce our
/// own validation message instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankingQuery {
    pub category: Option<String>,
    pub platform: Option<String>,
    pub sort: Option<String>,
    pub sort_type: Option<String>,
    pub offset: Option<String>,
    pub start: Option<String>,
    pub limit: Option<String>,
    pub display: Option<String>,
    pub query: Option<String>,
    pub mode: Option<String>,
}

impl RankingQuery {
    /// Scope from the `platform` parameter, or `default` when absent.
    pub(super) fn scope(&self, default: Scope) -> Result<Scope, String> {
        match present(self.platform.as_deref()) {
            Some(raw) => Scope::parse(raw),
            None => Ok(default),
        }
    }

    pub(super) fn into_request(
        self,
        scope: Scope,
        default_mode: FallbackMode,
    ) -> Result<PipelineRequest, String> {
        let category = match present(self.category.as_deref()) {
            Some(raw) => Category::parse_filter(raw).map_err(|e| e.to_string())?,
            None => None,
        };
        let sort = match present(self.sort.as_deref()).or(present(self.sort_type.as_deref())) {
            Some(raw) => raw.parse::<SortKey>().map_err(|e| e.to_string())?,
            None => SortKey::default(),
        };
        let mode = match present(self.mode.as_deref()) {
            Some(raw) => raw.parse::<FallbackMode>().map_err(|e| e.to_string())?,
            None => default_mode,
        };

        let offset = match parse_count("offset", self.offset.as_deref())? {
            Some(offset) => offset,
            None => match parse_count("start", self.start.as_deref())? {
                Some(0) => return Err("start is 1-based and must be at least 1".to_string()),
                Some(start) => start - 1,
                None => 0,
            },
        };
        let count = match parse_count("limit", self.limit.as_deref())? {
            Some(limit) => Some(limit),
            None => parse_count("display", self.display.as_deref())?,
        }
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT);

        let platform = match scope {
            Scope::One(platform) => platform,
            Scope::All => Platform::ALL[0],
        };

        Ok(PipelineRequest {
            platform,
            category,
            sort,
            offset: offset.min(MAX_OFFSET),
            count,
            query: present(self.query.as_deref()).map(ToOwned::to_owned),
            mode,
        })
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<usize>, String> {
    match present(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("{name} must be a non-negative integer, got \"{value}\"")),
    }
}
