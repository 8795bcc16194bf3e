use thiserror::Error;

/// Failure of a single upstream marketplace call.
///
/// None of these are fatal to a ranking request: the pipeline logs them and
/// falls back to synthetic data.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{platform} credentials are not configured")]
    MissingCredentials { platform: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{platform} did not answer within {secs}s")]
    Timeout { platform: &'static str, secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("request signing failed: {0}")]
    Signing(String),
}

/// Failure of the image relay.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid image url: {0}")]
    InvalidUrl(String),

    #[error("host not allowed: {0}")]
    ForbiddenHost(String),

    #[error("fetch failed with status {status}")]
    UpstreamStatus { status: u16 },

    #[error("image exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("image fetch timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
