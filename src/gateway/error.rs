//! Generation backend error types

use thiserror::Error;

/// Errors from the text-generation backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Server-side failure that may succeed on retry.
    #[error("backend unavailable{}: {message}", status_suffix(.status))]
    Transient { status: Option<u16>, message: String },

    /// Failure that will not go away by retrying (bad credentials, malformed
    /// request, unusable response body).
    #[error("backend rejected request{}: {message}", status_suffix(.status))]
    Permanent { status: Option<u16>, message: String },

    /// The backend could not be constructed from configuration.
    #[error("backend misconfigured: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Status codes treated as transient.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

impl GatewayError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if is_retryable_status(status) {
            Self::Transient {
                status: Some(status),
                message,
            }
        } else {
            Self::Permanent {
                status: Some(status),
                message,
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { status, .. } | Self::Permanent { status, .. } => *status,
            Self::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() || e.is_connect() {
            Self::Transient {
                status: None,
                message: e.to_string(),
            }
        } else {
            Self::Permanent {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        }
    }
}
