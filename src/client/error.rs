//! Remote API errors

use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur when talking to the remote dashboard API
///
/// Every variant is a flavour of "remote unavailable"; the distinction is
/// kept for logs.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Remote API unreachable: {0}")]
    Unreachable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Remote API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::RemoteUnavailable
    }

    /// Classify a transport error from reqwest
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }
}

/// Result type for remote API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_is_remote_unavailable() {
        let errors = [
            ApiError::Unreachable("refused".to_string()),
            ApiError::Timeout,
            ApiError::Status {
                status: 503,
                message: "down".to_string(),
            },
            ApiError::Decode("eof".to_string()),
        ];
        for err in &errors {
            assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
        }
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 404,
            message: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Remote API error 404: missing");
    }
}
