use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Strict mode refused to substitute synthetic data.
    #[error("{platform} is unavailable: {reason}")]
    Unavailable {
        platform: &'static str,
        reason: String,
    },

    #[error("platform {0} is not registered")]
    Unregistered(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("product name is required")]
    MissingProduct,
}
