use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Wrapper every endpoint responds with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server considers the call successful.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Machine readable result code.
    #[serde(default)]
    pub code: String,
    /// Human readable message, shown verbatim on form failures.
    #[serde(default)]
    pub message: String,
    /// Payload; `null` for endpoints without one.
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// Take the payload, failing when the server sent none.
    pub fn into_data(self) -> ApiResult<T> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Classify a raw response into payload or [`ApiError`].
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ApiResult<Envelope<T>> {
    if !status.is_success() {
        let (code, message) = match serde_json::from_slice::<Envelope<serde::de::IgnoredAny>>(body) {
            Ok(envelope) => (envelope.code, envelope.message),
            Err(_) => (String::new(), String::new()),
        };
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ApiError::Unauthorized { status, message }
            }
            _ => ApiError::Server {
                status,
                code,
                message,
            },
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|source| ApiError::Decode { status, source })?;
    if !envelope.success {
        return Err(ApiError::Server {
            status,
            code: envelope.code,
            message: envelope.message,
        });
    }
    Ok(envelope)
}
