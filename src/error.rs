use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything that can go wrong between receiving a request and handing
/// back a rendered image. Nothing in this crate retries on its own.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid area of interest: {0}")]
    InvalidAoi(String),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("no imagery found: {0}")]
    NoImageryFound(String),

    #[error("band not found: {0}")]
    BandNotFound(String),

    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    #[error("retrieval timed out: {0}")]
    RetrievalTimeout(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("encode error: {0}")]
    EncodeError(String),
}

impl FetchError {
    /// Stable machine-readable discriminant for the HTTP layer.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidAoi(_) => "InvalidAOI",
            FetchError::InvalidDateRange(_) => "InvalidDateRange",
            FetchError::NoImageryFound(_) => "NoImageryFound",
            FetchError::BandNotFound(_) => "BandNotFound",
            FetchError::RetrievalFailed(_) => "RetrievalFailed",
            FetchError::RetrievalTimeout(_) => "RetrievalTimeout",
            FetchError::DecodeError(_) => "DecodeError",
            FetchError::EncodeError(_) => "EncodeError",
        }
    }

    /// Suggested HTTP status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::InvalidAoi(_) | FetchError::InvalidDateRange(_) => 400,
            FetchError::NoImageryFound(_) | FetchError::BandNotFound(_) => 404,
            FetchError::RetrievalFailed(_) => 502,
            FetchError::RetrievalTimeout(_) => 504,
            FetchError::DecodeError(_) | FetchError::EncodeError(_) => 500,
        }
    }
}

/// Map a transport error onto the retrieval taxonomy, keeping timeouts
/// distinct so callers can pick a different status code for them.
pub(crate) fn http_error(err: reqwest::Error, what: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::RetrievalTimeout(format!("{}: {}", what, err))
    } else {
        FetchError::RetrievalFailed(format!("{}: {}", what, err))
    }
}
