use reqwest::{Client, Url};
use shoprank_core::{NaverCredentials, Platform, SortKey};

use crate::error::UpstreamError;
use crate::types::{NaverErrorBody, NaverSearchResponse, RawItem};
use crate::upstream::{build_http_client, classify, normalise_base_url, with_deadline};

pub const DEFAULT_BASE_URL: &str = "https://openapi.naver.com";
const SEARCH_PATH: &str = "/v1/search/shop.json";

/// Client for the Naver Open API shopping search.
///
/// Authenticates with the `X-Naver-Client-Id` / `X-Naver-Client-Secret`
/// header pair. Use [`NaverClient::new`] for production or
/// [`NaverClient::with_base_url`] to point at a mock server in tests.
pub struct NaverClient {
    client: Client,
    credentials: NaverCredentials,
    base_url: String,
    timeout_secs: u64,
}

impl NaverClient {
    /// Upper bound on `display` accepted by the search endpoint.
    pub const MAX_DISPLAY: u32 = 100;
    /// Upper bound on `start` accepted by the search endpoint.
    pub const MAX_START: u32 = 1000;

    /// # Errors
    ///
    /// See [`NaverClient::with_base_url`].
    pub fn new(
        credentials: NaverCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// # Errors
    ///
    /// - [`UpstreamError::MissingCredentials`] if either credential is blank.
    /// - [`UpstreamError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    /// - [`UpstreamError::Http`] if the reqwest client cannot be built.
    pub fn with_base_url(
        credentials: NaverCredentials,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(UpstreamError::MissingCredentials {
                platform: Platform::Naver.id(),
            });
        }
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            credentials,
            base_url: normalise_base_url(base_url)?,
            timeout_secs,
        })
    }

    /// Fetches one page of shopping search results.
    ///
    /// `display` is clamped to 1–100 and `start` to 1–1000.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Api`] when Naver answers non-2xx with its error body.
    /// - [`UpstreamError::UnexpectedStatus`] for any other non-2xx.
    /// - [`UpstreamError::Timeout`] / [`UpstreamError::Http`] on transport failure.
    /// - [`UpstreamError::Deserialize`] when the body does not match.
    pub async fn search(
        &self,
        query: &str,
        display: u32,
        start: u32,
        sort: SortKey,
    ) -> Result<Vec<RawItem>, UpstreamError> {
        let url = self.search_url(query, display, start, sort)?;
        let secs = self.timeout_secs;

        let (status, body) = with_deadline(Platform::Naver, secs, async {
            let response = self
                .client
                .get(url.clone())
                .header("X-Naver-Client-Id", &self.credentials.client_id)
                .header("X-Naver-Client-Secret", &self.credentials.client_secret)
                .send()
                .await
                .map_err(|e| classify(e, Platform::Naver, secs))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| classify(e, Platform::Naver, secs))?;
            Ok((status, body))
        })
        .await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<NaverErrorBody>(&body) {
                return Err(UpstreamError::Api {
                    code: err.error_code,
                    message: err.error_message,
                });
            }
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: format!("{}{SEARCH_PATH}", self.base_url),
            });
        }

        let parsed = serde_json::from_str::<NaverSearchResponse>(&body).map_err(|e| {
            UpstreamError::Deserialize {
                context: format!("naver shopping search for \"{query}\""),
                source: e,
            }
        })?;

        Ok(parsed.items.into_iter().map(RawItem::from).collect())
    }

    fn search_url(
        &self,
        query: &str,
        display: u32,
        start: u32,
        sort: SortKey,
    ) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&format!("{}{SEARCH_PATH}", self.base_url)).map_err(|e| {
            UpstreamError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("display", &display.clamp(1, Self::MAX_DISPLAY).to_string())
            .append_pair("start", &start.clamp(1, Self::MAX_START).to_string())
            .append_pair("sort", sort_param(sort));
        Ok(url)
    }
}

/// Naver's `sort` parameter for a ranking sort key. Keys Naver has no
/// equivalent for use its relevance order and are re-sorted locally.
#[must_use]
pub fn sort_param(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Recency => "date",
        SortKey::PriceAsc => "asc",
        SortKey::PriceDesc => "dsc",
        SortKey::Rank | SortKey::Popularity | SortKey::Rating => "sim",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> NaverCredentials {
        NaverCredentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        }
    }

    #[test]
    fn sort_param_maps_keys() {
        assert_eq!(sort_param(SortKey::Rank), "sim");
        assert_eq!(sort_param(SortKey::Recency), "date");
        assert_eq!(sort_param(SortKey::PriceDesc), "dsc");
        assert_eq!(sort_param(SortKey::Popularity), "sim");
    }

    #[test]
    fn search_url_clamps_display_and_encodes_query() {
        let client = NaverClient::new(credentials(), 5, "test").unwrap();
        let url = client.search_url("무선 이어폰", 500, 0, SortKey::PriceAsc).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("query".into(), "무선 이어폰".into())));
        assert!(pairs.contains(&("display".into(), "100".into())));
        assert!(pairs.contains(&("start".into(), "1".into())));
        assert!(pairs.contains(&("sort".into(), "asc".into())));
    }

    #[test]
    fn rejects_blank_credentials() {
        let creds = NaverCredentials {
            client_id: "id".into(),
            client_secret: " ".into(),
        };
        assert!(matches!(
            NaverClient::new(creds, 5, "test"),
            Err(UpstreamError::MissingCredentials { platform: "naver" })
        ));
    }
}
