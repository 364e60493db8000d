//! Unified error types for sitesnap.
//!
//! Each variant renders with a stable code prefix for logs, and maps to an
//! MCP error code plus a short message safe to show callers.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the sitesnap server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (empty batch, too many URLs, bad URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Remote fetch of a single URL failed; fails the whole batch.
    #[error("FETCH_FAILED: failed to get data from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The batch did not complete within the request deadline.
    #[error("REQUEST_TIMEOUT: {0}")]
    RequestTimeout(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cache store could not answer in time or is otherwise unreachable.
    #[error("CACHE_ERROR: {0}")]
    CacheUnavailable(String),

    /// Table or column name is not a plain SQL identifier.
    #[error("CACHE_ERROR: invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Unexpected internal failure (task panic, encoding failure).
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    /// Build a fetch failure for `url`.
    pub fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::FetchFailed { url: url.into(), reason: reason.to_string() }
    }

    /// Short human-readable message for callers.
    ///
    /// The full `Display` output carries the underlying cause and is meant
    /// for logs only.
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) => format!("input validation error: {msg}"),
            Error::FetchFailed { url, .. } => format!("failed to get data from {url}"),
            Error::RequestTimeout(_) => "request processing exceeded the configured timeout".to_string(),
            Error::Database(_)
            | Error::MigrationFailed(_)
            | Error::CacheUnavailable(_)
            | Error::InvalidIdentifier(_)
            | Error::Internal(_) => "internal service error".to_string(),
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::FetchFailed { .. } => -32008,
            Error::RequestTimeout(_) => -32006,
            Error::Database(_) | Error::MigrationFailed(_) | Error::CacheUnavailable(_) | Error::InvalidIdentifier(_) => {
                -32002
            }
            Error::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.public_message().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::fetch_failed("https://b.test", "connection refused");
        let rendered = err.to_string();
        assert!(rendered.contains("FETCH_FAILED"));
        assert!(rendered.contains("https://b.test"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_public_message_hides_cause() {
        let err = Error::fetch_failed("https://b.test", "connection refused");
        let message = err.public_message();
        assert!(message.contains("https://b.test"));
        assert!(!message.contains("connection refused"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let mcp_err: McpError = Error::fetch_failed("https://b.test", "boom").into();
        assert_eq!(mcp_err.code.0, -32008);

        let mcp_err: McpError = Error::InvalidInput("no urls".into()).into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("no urls"));

        let mcp_err: McpError = Error::CacheUnavailable("down".into()).into();
        assert_eq!(mcp_err.code.0, -32002);
        assert_eq!(mcp_err.message, "internal service error");
    }
}
