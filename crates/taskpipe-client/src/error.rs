//! Error types for the upstream client.

use thiserror::Error;

/// Upstream client errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transient transport failure (connection reset, timeout, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream answered with a non-2xx status; never retried
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamStatus {
        /// Upstream HTTP status code
        status: u16,
        /// Upstream response body, as far as it could be read
        message: String,
    },

    /// The upstream payload could not be decoded
    #[error("Failed to decode upstream payload: {0}")]
    Decode(String),

    /// The retry budget ran out on a transient failure
    #[error("Retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// How many attempts were made
        attempts: u32,
        /// The last transient failure
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Whether the retry policy may try the operation again.
    ///
    /// Only transport-level failures qualify; an upstream status response is
    /// an answer, not an outage.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::UpstreamStatus {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            // Connect errors, timeouts and everything else transport-shaped
            ApiError::Transport(e.to_string())
        }
    }
}
