//! Error types shared across the crate.
//!
//! Routing deliberately has no error type: every navigation request resolves
//! to either a render or a redirect, and invalid locales are coerced rather
//! than reported. The enums here cover the two places real failures exist:
//! durable client storage and the backend API.

use thiserror::Error;

/// Failure while reading or writing durable client storage.
///
/// Storage errors never reach the user. Callers log them and fall back to
/// in-memory state for the rest of the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open storage file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist storage file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure from a backend API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON envelope.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The envelope decoded but its `data` payload had the wrong shape.
    #[error("malformed payload from {endpoint}: {source}")]
    Payload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend returned a non-success envelope code.
    #[error("{endpoint} returned code {code}: {message}")]
    Backend {
        endpoint: String,
        code: i32,
        message: String,
    },

    /// An operation that requires a session was called without one.
    #[error("not logged in")]
    NotLoggedIn,
}

impl ApiError {
    /// Whether retrying the same request might succeed.
    ///
    /// Only transport-level failures are retryable; a backend rejection or a
    /// malformed body will not improve on a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = ApiError::Backend {
            endpoint: "/api/frontend/auth/login".to_string(),
            code: 401,
            message: "invalid credentials".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("invalid credentials"));
        assert!(text.contains("/api/frontend/auth/login"));
    }

    #[test]
    fn test_backend_error_not_transient() {
        let err = ApiError::Backend {
            endpoint: "/x".to_string(),
            code: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_not_logged_in_not_transient() {
        assert!(!ApiError::NotLoggedIn.is_transient());
    }

    #[test]
    fn test_storage_error_display_includes_path() {
        let err = StorageError::Write {
            path: "/tmp/settings.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/settings.json"));
    }
}
