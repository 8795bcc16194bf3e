//! Coupang Partners product search with CEA HMAC request signing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use sha2::Sha256;
use shoprank_core::{CoupangCredentials, Platform};

use crate::error::UpstreamError;
use crate::types::{CoupangSearchResponse, RawItem};
use crate::upstream::{build_http_client, classify, normalise_base_url, with_deadline};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_BASE_URL: &str = "https://api-gateway.coupang.com";
pub const SEARCH_PATH: &str = "/v2/providers/affiliate_open_api/apis/openapi/products/search";

/// `rCode` value of a successful Partners API response.
const SUCCESS_CODE: &str = "0";

pub struct CoupangClient {
    client: Client,
    credentials: CoupangCredentials,
    base_url: String,
    timeout_secs: u64,
}

impl CoupangClient {
    /// Largest `limit` the search endpoint honours.
    pub const MAX_LIMIT: u32 = 10;

    /// # Errors
    ///
    /// See [`CoupangClient::with_base_url`].
    pub fn new(
        credentials: CoupangCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// # Errors
    ///
    /// - [`UpstreamError::MissingCredentials`] if either key is blank.
    /// - [`UpstreamError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    /// - [`UpstreamError::Http`] if the reqwest client cannot be built.
    pub fn with_base_url(
        credentials: CoupangCredentials,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        if credentials.access_key.trim().is_empty() || credentials.secret_key.trim().is_empty() {
            return Err(UpstreamError::MissingCredentials {
                platform: Platform::Coupang.id(),
            });
        }
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            credentials,
            base_url: normalise_base_url(base_url)?,
            timeout_secs,
        })
    }

    /// Signed keyword search. `limit` is clamped to 1–[`Self::MAX_LIMIT`].
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Api`] when `rCode` is not `"0"`.
    /// - [`UpstreamError::UnexpectedStatus`] for a non-2xx status.
    /// - [`UpstreamError::Timeout`] / [`UpstreamError::Http`] on transport failure.
    /// - [`UpstreamError::Deserialize`] when the body does not match.
    /// - [`UpstreamError::Signing`] if the secret key is unusable.
    pub async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<RawItem>, UpstreamError> {
        let limit = limit.clamp(1, Self::MAX_LIMIT).to_string();
        let query = canonical_query(&[("keyword", keyword), ("limit", limit.as_str())]);
        let authorization =
            authorization_header(&self.credentials, "GET", SEARCH_PATH, &query, Utc::now())?;
        let url = format!("{}{SEARCH_PATH}?{query}", self.base_url);
        let secs = self.timeout_secs;

        let (status, body) = with_deadline(Platform::Coupang, secs, async {
            let response = self
                .client
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, authorization)
                .header(reqwest::header::CONTENT_TYPE, "application/json;charset=UTF-8")
                .send()
                .await
                .map_err(|e| classify(e, Platform::Coupang, secs))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| classify(e, Platform::Coupang, secs))?;
            Ok((status, body))
        })
        .await?;

        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: format!("{}{SEARCH_PATH}", self.base_url),
            });
        }

        let parsed = serde_json::from_str::<CoupangSearchResponse>(&body).map_err(|e| {
            UpstreamError::Deserialize {
                context: format!("coupang product search for \"{keyword}\""),
                source: e,
            }
        })?;

        if parsed.r_code != SUCCESS_CODE {
            return Err(UpstreamError::Api {
                code: parsed.r_code,
                message: parsed.r_message,
            });
        }

        Ok(parsed
            .data
            .map(|d| d.product_data)
            .unwrap_or_default()
            .into_iter()
            .map(RawItem::from)
            .collect())
    }
}

/// Query string with keys sorted and both keys and values percent-encoded.
///
/// The same string is signed and sent, so the gateway recomputes an identical
/// message.
#[must_use]
pub fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs = params.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the `Authorization` header value for a request signed at `at`.
///
/// Message is `signed-date + method + path + query`; the signature is the
/// lowercase hex HMAC-SHA256 of it. No spaces follow the commas.
///
/// # Errors
///
/// Returns [`UpstreamError::Signing`] if the HMAC cannot be keyed.
pub fn authorization_header(
    credentials: &CoupangCredentials,
    method: &str,
    path: &str,
    query: &str,
    at: DateTime<Utc>,
) -> Result<String, UpstreamError> {
    let signed_date = at.format("%y%m%dT%H%M%SZ").to_string();
    let message = format!("{signed_date}{method}{path}{query}");

    let mut mac = HmacSha256::new_from_slice(credentials.secret_key.as_bytes())
        .map_err(|e| UpstreamError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!(
        "CEA algorithm=HmacSHA256,access-key={},signed-date={signed_date},signature={signature}",
        credentials.access_key
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn credentials() -> CoupangCredentials {
        CoupangCredentials {
            access_key: "access-key".into(),
            secret_key: "secret-key".into(),
        }
    }

    #[test]
    fn canonical_query_sorts_and_encodes() {
        assert_eq!(
            canonical_query(&[("limit", "5"), ("keyword", "물")]),
            "keyword=%EB%AC%BC&limit=5"
        );
    }

    #[test]
    fn authorization_header_matches_reference_signature() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let header = authorization_header(
            &credentials(),
            "GET",
            SEARCH_PATH,
            "keyword=%EB%AC%BC&limit=5",
            at,
        )
        .unwrap();
        assert_eq!(
            header,
            "CEA algorithm=HmacSHA256,access-key=access-key,signed-date=240102T030405Z,\
             signature=d26fc4e7e0b2f51fd961156a0a62cba3bc091dcd58c58c9c3fd7451d482e0e4e"
        );
    }

    #[test]
    fn rejects_blank_keys() {
        let creds = CoupangCredentials {
            access_key: String::new(),
            secret_key: "s".into(),
        };
        assert!(matches!(
            CoupangClient::new(creds, 5, "test"),
            Err(UpstreamError::MissingCredentials { platform: "coupang" })
        ));
    }
}
