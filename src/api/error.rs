use thiserror::Error;

/// Central error type for content API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing API token")]
    MissingCredentials,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Invalid API token")]
    InvalidToken,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Api(String),
}

impl ApiError {
    /// Whether the failure is a plain "nothing there" outcome that a
    /// front-end may render as an empty state rather than an error.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ApiError::NoData(_))
    }
}

/// Convenience type alias for content API results.
pub type ApiResult<T> = Result<T, ApiError>;
