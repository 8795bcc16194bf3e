//! Dispatch over the live marketplace integrations.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, Url};
use shoprank_core::{Platform, SortKey};

use crate::coupang::CoupangClient;
use crate::error::UpstreamError;
use crate::naver::NaverClient;
use crate::types::RawItem;

/// Connect timeout for every upstream client. The request timeout is
/// configurable and always at least this tight.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// A configured live search client for one platform.
pub enum UpstreamClient {
    Naver(NaverClient),
    Coupang(CoupangClient),
}

/// Items gathered by [`UpstreamClient::accumulate`].
///
/// `error` is set when a call failed part-way; `items` then holds whatever
/// earlier calls returned.
#[derive(Debug, Default)]
pub struct Accumulated {
    pub items: Vec<RawItem>,
    pub error: Option<UpstreamError>,
}

impl UpstreamClient {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            UpstreamClient::Naver(_) => Platform::Naver,
            UpstreamClient::Coupang(_) => Platform::Coupang,
        }
    }

    /// Largest item count a single upstream call may request.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        match self {
            UpstreamClient::Naver(_) => NaverClient::MAX_DISPLAY,
            UpstreamClient::Coupang(_) => CoupangClient::MAX_LIMIT,
        }
    }

    /// Highest 1-based `start` the platform accepts, or `None` when its
    /// search endpoint has no paging.
    #[must_use]
    pub fn max_start(&self) -> Option<u32> {
        match self {
            UpstreamClient::Naver(_) => Some(NaverClient::MAX_START),
            UpstreamClient::Coupang(_) => None,
        }
    }

    /// One search call for the page beginning at the 1-based `start`.
    /// `limit` is capped at [`Self::page_size`]; `start` is ignored by
    /// platforms without paging.
    ///
    /// # Errors
    ///
    /// Propagates the client's [`UpstreamError`].
    pub async fn search(
        &self,
        term: &str,
        limit: u32,
        start: u32,
        sort: SortKey,
    ) -> Result<Vec<RawItem>, UpstreamError> {
        match self {
            UpstreamClient::Naver(client) => client.search(term, limit, start, sort).await,
            UpstreamClient::Coupang(client) => client.search(term, limit).await,
        }
    }

    /// Gathers up to `target` distinct items, paging through each term
    /// before moving to the next.
    ///
    /// A term is paged (`start` advancing by the page just requested) until
    /// the target is met, a page comes back short, or the platform's
    /// `max_start` is passed. Calls are sequential with `delay` between them.
    /// Items repeated across pages or terms (same product id, else same link)
    /// are kept once. A failed call stops the sequence and is returned
    /// alongside the items gathered so far.
    pub async fn accumulate(
        &self,
        terms: &[String],
        target: usize,
        sort: SortKey,
        delay: Duration,
    ) -> Accumulated {
        let platform = self.platform();
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut calls = 0_usize;

        'terms: for term in terms {
            let mut start = 1_u32;
            while items.len() < target {
                if calls > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                calls += 1;

                let remaining = u32::try_from(target - items.len()).unwrap_or(u32::MAX);
                let limit = remaining.min(self.page_size());

                let batch = match self.search(term, limit, start, sort).await {
                    Ok(batch) => batch,
                    Err(error) => {
                        return Accumulated {
                            items,
                            error: Some(error),
                        };
                    }
                };
                tracing::debug!(
                    platform = platform.id(),
                    term = term.as_str(),
                    start,
                    returned = batch.len(),
                    "upstream search page received"
                );

                let short = batch.len() < limit as usize;
                for item in batch {
                    if items.len() >= target {
                        break 'terms;
                    }
                    if seen.insert(item.dedupe_key()) {
                        items.push(item);
                    }
                }

                match self.max_start() {
                    Some(max_start) if !short => {
                        start = start.saturating_add(limit);
                        if start > max_start {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            if items.len() >= target {
                break;
            }
        }

        Accumulated { items, error: None }
    }
}

/// Builds the shared reqwest client configuration for upstream calls.
pub(crate) fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, UpstreamError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base_url` and strips any trailing slash so paths can be appended.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<String, UpstreamError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| UpstreamError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UpstreamError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

/// Maps a reqwest failure, reporting timeouts as [`UpstreamError::Timeout`].
pub(crate) fn classify(err: reqwest::Error, platform: Platform, secs: u64) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout {
            platform: platform.id(),
            secs,
        }
    } else {
        UpstreamError::Http(err)
    }
}

/// Wraps `fut` in a hard deadline of `secs` seconds.
pub(crate) async fn with_deadline<T, F>(
    platform: Platform,
    secs: u64,
    fut: F,
) -> Result<T, UpstreamError>
where
    F: std::future::Future<Output = Result<T, UpstreamError>>,
{
    tokio::time::timeout(Duration::from_secs(secs), fut)
        .await
        .map_err(|_| UpstreamError::Timeout {
            platform: platform.id(),
            secs,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_base_url_trims_trailing_slash() {
        assert_eq!(
            normalise_base_url("https://openapi.naver.com/").unwrap(),
            "https://openapi.naver.com"
        );
    }

    #[test]
    fn normalise_base_url_rejects_non_http() {
        assert!(matches!(
            normalise_base_url("ftp://example.com"),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            normalise_base_url("not a url"),
            Err(UpstreamError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn with_deadline_reports_timeout() {
        let result: Result<(), UpstreamError> = with_deadline(Platform::Naver, 0, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            result,
            Err(UpstreamError::Timeout {
                platform: "naver",
                ..
            })
        ));
    }
}
