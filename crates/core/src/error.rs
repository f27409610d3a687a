//! Error types surfaced by the tracker API client.

pub use reqwest::StatusCode;

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network-level failure: connect, timeout, TLS, body read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the credential (401/403).
    #[error("authentication required ({status}): {message}")]
    Unauthorized {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Envelope message, possibly empty.
        message: String,
    },

    /// The server reported a business error through the envelope.
    #[error("server error {code} ({status}): {message}")]
    Server {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Envelope error code, possibly empty.
        code: String,
        /// Envelope message, possibly empty.
        message: String,
    },

    /// The response body was not a valid envelope.
    #[error("failed to decode response ({status}): {source}")]
    Decode {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A successful envelope carried no `data`.
    #[error("response envelope carried no data")]
    MissingData,
}

impl ApiError {
    /// Whether the failure means the stored credential is missing or invalid.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Server-supplied message, when the server sent a non-empty one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Server { message, .. } => {
                Some(message.as_str()).filter(|value| !value.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Server message, or `fallback` when none is available.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Result alias for API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
