//! Error classification shared by every layer.
//!
//! Each layer keeps its own `thiserror` enum; [`ErrorKind`] is the coarse
//! taxonomy the front ends branch on.

use std::fmt;

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or wrong email/password
    InvalidCredentials,
    /// Network failure, timeout, non-2xx or undecodable remote response
    RemoteUnavailable,
    /// Persisted key-value entries could not be read or written
    Storage,
    /// Anything else (template rendering, token signing)
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::RemoteUnavailable => "REMOTE_UNAVAILABLE",
            ErrorKind::Storage => "STORAGE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
