use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when parsing request-level identifiers into model types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown sort key: {0}")]
    UnknownSort(String),

    #[error("unknown fallback mode: {0} (expected \"strict\" or \"lenient\")")]
    UnknownMode(String),
}
