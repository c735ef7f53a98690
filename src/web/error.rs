//! Web Error Types
//!
//! Errors that escape a handler become an HTML error page carrying a
//! request id that is also logged.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::client::ApiError;
use crate::error::ErrorKind;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::web::pages::ErrorPage;

/// Web layer error types
#[derive(Error, Debug)]
pub enum WebError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote API error: {0}")]
    Remote(#[from] ApiError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebError::Session(e) => e.kind(),
            WebError::Storage(_) => ErrorKind::Storage,
            WebError::Remote(e) => e.kind(),
            WebError::Render(_) | WebError::Io(_) | WebError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::RemoteUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Storage | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.kind().code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Web error occurred"
        );

        let page = ErrorPage {
            code,
            message: self.to_string(),
            request_id: request_id.clone(),
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to render error page");
                (status, format!("{code} (request id {request_id})")).into_response()
            }
        }
    }
}

/// Result type for web handlers
pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::from(SessionError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(WebError::from(ApiError::Timeout).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            WebError::from(StorageError::Lock("poisoned".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_carries_status() {
        let response = WebError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
