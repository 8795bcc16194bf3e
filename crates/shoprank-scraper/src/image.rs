//! Image relay restricted to an allow-list of marketplace CDN hosts.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client, Url};

use crate::error::ProxyError;

/// Largest image body relayed.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const MAX_REDIRECTS: usize = 5;
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// A fetched image ready to relay.
#[derive(Debug)]
pub struct ProxiedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct ImageProxy {
    client: Client,
    allowed_hosts: Arc<Vec<String>>,
    timeout_secs: u64,
}

impl ImageProxy {
    /// Builds a proxy that only fetches from `allowed_hosts` (or their
    /// subdomains). Redirects are followed only while they stay on the list.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the reqwest client cannot be built.
    pub fn new(
        allowed_hosts: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProxyError> {
        let allowed_hosts: Arc<Vec<String>> = Arc::new(
            allowed_hosts
                .into_iter()
                .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        );
        let policy_hosts = Arc::clone(&allowed_hosts);
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if host_allowed(&policy_hosts, attempt.url()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent(user_agent)
            .redirect(policy)
            .build()?;
        Ok(Self {
            client,
            allowed_hosts,
            timeout_secs,
        })
    }

    /// Validates a target URL without fetching it.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::InvalidUrl`] for unparseable or non-http(s) URLs.
    /// - [`ProxyError::ForbiddenHost`] when the host is not allowed.
    pub fn check(&self, raw: &str) -> Result<Url, ProxyError> {
        let url = Url::parse(raw.trim()).map_err(|e| ProxyError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidUrl(format!(
                "unsupported scheme \"{}\"",
                url.scheme()
            )));
        }
        if !host_allowed(&self.allowed_hosts, &url) {
            return Err(ProxyError::ForbiddenHost(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }
        Ok(url)
    }

    /// Fetches an allowed image.
    ///
    /// # Errors
    ///
    /// - Anything [`ImageProxy::check`] rejects.
    /// - [`ProxyError::ForbiddenHost`] when the origin redirects off the list.
    /// - [`ProxyError::UpstreamStatus`] when the origin answers non-2xx.
    /// - [`ProxyError::TooLarge`] above [`MAX_IMAGE_BYTES`].
    /// - [`ProxyError::Timeout`] / [`ProxyError::Http`] on transport failure.
    pub async fn fetch(&self, raw: &str) -> Result<ProxiedImage, ProxyError> {
        let url = self.check(raw)?;
        let deadline = Duration::from_secs(self.timeout_secs);
        tokio::time::timeout(deadline, self.fetch_checked(url))
            .await
            .map_err(|_| ProxyError::Timeout)?
    }

    async fn fetch_checked(&self, url: Url) -> Result<ProxiedImage, ProxyError> {
        let mut response = self.client.get(url).send().await.map_err(map_http)?;
        let status = response.status();
        if status.is_redirection() {
            // The redirect policy only stops on hosts outside the allow-list.
            if let Some(target) = redirect_target(&response) {
                tracing::info!(location = %target, "image redirect left the allow-list");
                return Err(ProxyError::ForbiddenHost(
                    target.host_str().unwrap_or_default().to_string(),
                ));
            }
        }
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
            });
        }
        if response
            .content_length()
            .is_some_and(|len| len > MAX_IMAGE_BYTES as u64)
        {
            return Err(ProxyError::TooLarge {
                limit: MAX_IMAGE_BYTES,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_http)? {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(ProxyError::TooLarge {
                    limit: MAX_IMAGE_BYTES,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(ProxiedImage {
            content_type,
            bytes,
        })
    }
}

/// `Location` of a redirect response, resolved against the request URL.
fn redirect_target(response: &reqwest::Response) -> Option<Url> {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()?;
    response.url().join(location).ok()
}

fn map_http(err: reqwest::Error) -> ProxyError {
    if err.is_timeout() {
        ProxyError::Timeout
    } else {
        ProxyError::Http(err)
    }
}

/// Exact host match or a subdomain of an allowed host.
fn host_allowed(allowed: &[String], url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowed.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
