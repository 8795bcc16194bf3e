//! Per-platform capability table.
//!
//! Adding a marketplace means adding one descriptor here; the pipeline has no
//! per-platform branches.

use shoprank_core::{AppConfig, KeywordTable, Platform, ProductRecord, DEFAULT_KEYWORDS};
use shoprank_scraper::{
    normalize_item, CoupangClient, NaverClient, NormalizeContext, RawItem, UpstreamClient,
    UpstreamError,
};

use crate::synthetic::{profile_for, SyntheticProfile};

/// Catalog size for platforms with a live integration.
const LIVE_CATALOG_SIZE: usize = 200;
/// Catalog size for synthetic-only marketplaces.
const MARKETPLACE_CATALOG_SIZE: usize = 100;

/// Live-data capability of a platform.
pub enum Upstream {
    /// No live integration exists; always synthetic.
    Unsupported,
    /// Integration exists but credentials are absent.
    Unconfigured,
    Ready(UpstreamClient),
}

impl Upstream {
    #[must_use]
    pub fn state(&self) -> &'static str {
        match self {
            Upstream::Unsupported => "unsupported",
            Upstream::Unconfigured => "unconfigured",
            Upstream::Ready(_) => "ready",
        }
    }
}

pub type NormalizeFn = fn(RawItem, &NormalizeContext) -> ProductRecord;

pub struct PlatformDescriptor {
    pub platform: Platform,
    pub upstream: Upstream,
    pub normalize: NormalizeFn,
    pub keywords: &'static KeywordTable,
    pub profile: &'static SyntheticProfile,
    /// Minimum number of records built per request.
    pub catalog_size: usize,
    /// Search terms used when the request names neither a query nor a category.
    pub default_terms: &'static [&'static str],
}

impl PlatformDescriptor {
    /// Descriptor with no live upstream.
    #[must_use]
    pub fn synthetic(platform: Platform) -> Self {
        let catalog_size = match platform {
            Platform::Naver | Platform::Coupang => LIVE_CATALOG_SIZE,
            _ => MARKETPLACE_CATALOG_SIZE,
        };
        let upstream = match platform {
            Platform::Naver | Platform::Coupang => Upstream::Unconfigured,
            _ => Upstream::Unsupported,
        };
        Self {
            platform,
            upstream,
            normalize: normalize_item,
            keywords: DEFAULT_KEYWORDS,
            profile: profile_for(platform),
            catalog_size,
            default_terms: default_terms(platform),
        }
    }
}

fn default_terms(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Naver => &["인기상품", "베스트", "신상품"],
        Platform::Coupang => &["베스트셀러", "로켓배송 인기", "골드박스"],
        _ => &["인기상품"],
    }
}

pub struct Registry {
    descriptors: Vec<PlatformDescriptor>,
}

impl Registry {
    /// Builds one descriptor per platform, wiring live clients for every
    /// integration whose credentials are configured.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when a configured client cannot be built
    /// (for example an invalid base URL override).
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let mut registry = Self::synthetic_only();

        if let Some(credentials) = &config.naver {
            let client = NaverClient::with_base_url(
                credentials.clone(),
                &config.naver_base_url,
                config.upstream_timeout_secs,
                &config.upstream_user_agent,
            )?;
            registry.set_upstream(Platform::Naver, Upstream::Ready(UpstreamClient::Naver(client)));
        }

        if let Some(credentials) = &config.coupang {
            let client = CoupangClient::with_base_url(
                credentials.clone(),
                &config.coupang_base_url,
                config.upstream_timeout_secs,
                &config.upstream_user_agent,
            )?;
            registry.set_upstream(
                Platform::Coupang,
                Upstream::Ready(UpstreamClient::Coupang(client)),
            );
        }

        Ok(registry)
    }

    /// Registry with every platform present and no live clients.
    #[must_use]
    pub fn synthetic_only() -> Self {
        Self {
            descriptors: Platform::ALL
                .into_iter()
                .map(PlatformDescriptor::synthetic)
                .collect(),
        }
    }

    pub fn set_upstream(&mut self, platform: Platform, upstream: Upstream) {
        if let Some(descriptor) = self.descriptors.iter_mut().find(|d| d.platform == platform) {
            descriptor.upstream = upstream;
        }
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformDescriptor> {
        self.descriptors.iter().find(|d| d.platform == platform)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use shoprank_core::config::build_app_config;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        build_app_config(|key| map.get(key).cloned().ok_or(VarError::NotPresent)).unwrap()
    }

    #[test]
    fn unconfigured_integrations_are_distinguished_from_unsupported() {
        let registry = Registry::from_config(&config(&[])).unwrap();
        assert_eq!(registry.get(Platform::Naver).unwrap().upstream.state(), "unconfigured");
        assert_eq!(registry.get(Platform::Coupang).unwrap().upstream.state(), "unconfigured");
        assert_eq!(registry.get(Platform::Ssg).unwrap().upstream.state(), "unsupported");
        assert_eq!(registry.iter().count(), Platform::ALL.len());
    }

    #[test]
    fn configured_credentials_yield_ready_clients() {
        let registry = Registry::from_config(&config(&[
            ("NAVER_CLIENT_ID", "id"),
            ("NAVER_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(registry.get(Platform::Naver).unwrap().upstream.state(), "ready");
        assert_eq!(registry.get(Platform::Coupang).unwrap().upstream.state(), "unconfigured");
    }

    #[test]
    fn invalid_base_url_override_is_an_error() {
        let result = Registry::from_config(&config(&[
            ("COUPANG_ACCESS_KEY", "a"),
            ("COUPANG_SECRET_KEY", "s"),
            ("SHOPRANK_COUPANG_BASE_URL", "gopher://nope"),
        ]));
        assert!(matches!(result, Err(UpstreamError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn catalog_sizes_follow_integration_kind() {
        let registry = Registry::synthetic_only();
        assert_eq!(registry.get(Platform::Naver).unwrap().catalog_size, 200);
        assert_eq!(registry.get(Platform::Lotte).unwrap().catalog_size, 100);
    }
}
