//! Error taxonomy for the Wastedge API layer

use thiserror::Error;

/// Errors surfaced by the API client, codec, and query builders.
///
/// None of these are retried inside the client. Callers that want retries
/// wrap calls in [`crate::api::RetryPolicy`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was missing, empty, or inconsistent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The codec cannot render this value for the declared data type
    #[error("Unsupported value type: cannot serialize {value} as {data_type}")]
    UnsupportedValueType { value: String, data_type: String },

    /// A date string did not match the exact wire pattern
    #[error("Malformed date '{input}': expected {expected}")]
    MalformedDate { input: String, expected: &'static str },

    /// Network or HTTP-level failure, including non-2xx responses
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    /// The response body was not valid JSON or had an unexpected shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// HTTP status code for transport errors that got a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Request construction failed before anything was sent
        if err.is_builder() {
            return Self::InvalidArgument(err.to_string());
        }
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_status() {
        let err = ApiError::Transport {
            status: Some(503),
            message: "service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Transport error (HTTP 503): service unavailable"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_request_build_failure_is_invalid_argument() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(err.is_builder());

        let err = ApiError::from(err);
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = ApiError::Transport {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Transport error: connection refused");
        assert_eq!(err.status(), None);
    }
}
