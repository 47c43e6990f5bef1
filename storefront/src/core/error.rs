//! # Common Error Types
//!
//! Consolidated error handling for the storefront client.
//!
//! Every failure in the data layer resolves to an [`AppError`]; nothing here is
//! fatal to the process.
//!
//! ## Error Categories
//!
//! - **Unauthenticated**: no session key found in the persistent store
//! - **Validation**: a required field is missing or malformed (checked before any network call)
//! - **NetworkUnreachable**: connection refused, DNS failure, connection reset
//! - **Timeout**: the HTTP client's fixed request timeout elapsed
//! - **Server**: the backend answered 4xx/5xx, or a 2xx body could not be decoded
//! - **Storage**: persistent read/write failure
//!
//! ## Propagation
//!
//! - Validation and unauthenticated errors are handled locally by controllers
//!   (form error text, redirect to login).
//! - Network and server errors surface to presentation with [`AppError::user_message`]
//!   and a retry affordance when [`AppError::is_retryable`] says so.
//! - Storage errors are logged and treated as an absent value.
//!
//! ```rust
//! use storefront::core::error::{AppError, ErrorKind};
//!
//! let err = AppError::Server { status: Some(401), message: "Invalid token".to_string() };
//! assert_eq!(err.kind(), ErrorKind::Server);
//! assert_eq!(err.http_status(), Some(401));
//! assert!(!err.is_retryable());
//! assert_eq!(err.to_string(), "Server error (401): Invalid token");
//! ```

use thiserror::Error;

/// Coarse classification of an [`AppError`], stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    Validation,
    NetworkUnreachable,
    Timeout,
    Server,
    Storage,
}

impl ErrorKind {
    /// Short machine-readable code, e.g. `"no-session"`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "no-session",
            ErrorKind::Validation => "validation",
            ErrorKind::NetworkUnreachable => "network-unreachable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Server => "server",
            ErrorKind::Storage => "storage",
        }
    }
}

/// Application-wide error type for the storefront data layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// No session key was found; the user must log in again.
    #[error("No active session")]
    Unauthenticated,

    /// A required input was missing or invalid. Raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend could not be reached at all.
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The request exceeded the client's fixed timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with an error status, or with a body that could not be decoded
    /// (`status` is `None` in that case).
    #[error("Server error{}: {message}", status_label(.status))]
    Server {
        status: Option<u16>,
        message: String,
    },

    /// Persistent storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated => ErrorKind::Unauthenticated,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            AppError::Timeout(_) => ErrorKind::Timeout,
            AppError::Server { .. } => ErrorKind::Server,
            AppError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status of a server error, if the backend sent one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            AppError::Server { status, .. } => *status,
            _ => None,
        }
    }

    /// True for 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status(), Some(400..=499))
    }

    /// Whether presentation should offer a manual retry. Nothing retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkUnreachable(_) | AppError::Timeout(_) => true,
            AppError::Server { status, .. } => match status {
                Some(408) | Some(429) => true,
                Some(code) => *code >= 500,
                None => true,
            },
            AppError::Unauthenticated | AppError::Validation(_) | AppError::Storage(_) => false,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Please log in again.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NetworkUnreachable(_) => {
                "Unable to connect to the server. Please check your connection and try again."
                    .to_string()
            }
            AppError::Timeout(_) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            AppError::Server { message, .. } => message.clone(),
            AppError::Storage(_) => "Could not access saved data on this device.".to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::Server {
                status: err.status().map(|s| s.as_u16()),
                message: format!("Invalid response body: {}", err),
            }
        } else if err.is_status() {
            AppError::Server {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            AppError::Validation(format!("Invalid request: {}", err))
        } else {
            AppError::NetworkUnreachable(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

// Only local persisted data is decoded through serde_json directly; HTTP bodies
// are classified by the client's response hook.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("Corrupt stored value: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_code() {
        assert_eq!(AppError::Unauthenticated.kind().code(), "no-session");
        assert_eq!(AppError::Timeout("t".into()).kind(), ErrorKind::Timeout);
        assert_eq!(AppError::Storage("disk".into()).kind().code(), "storage");
    }

    #[test]
    fn test_server_error_display_with_and_without_status() {
        let with = AppError::Server {
            status: Some(503),
            message: "Service Unavailable".into(),
        };
        assert_eq!(with.to_string(), "Server error (503): Service Unavailable");

        let without = AppError::Server {
            status: None,
            message: "Invalid response body".into(),
        };
        assert_eq!(without.to_string(), "Server error: Invalid response body");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AppError::NetworkUnreachable("refused".into()).is_retryable());
        assert!(AppError::Timeout("10s".into()).is_retryable());
        assert!(AppError::Server { status: Some(500), message: String::new() }.is_retryable());
        assert!(AppError::Server { status: Some(429), message: String::new() }.is_retryable());
        assert!(!AppError::Server { status: Some(401), message: String::new() }.is_retryable());
        assert!(!AppError::Validation("x".into()).is_retryable());
        assert!(!AppError::Unauthenticated.is_retryable());
    }

    #[test]
    fn test_client_error_detection() {
        assert!(AppError::Server { status: Some(404), message: String::new() }.is_client_error());
        assert!(!AppError::Server { status: Some(502), message: String::new() }.is_client_error());
        assert!(!AppError::Timeout("t".into()).is_client_error());
    }

    #[test]
    fn test_user_message_keeps_server_text() {
        let err = AppError::Server {
            status: Some(400),
            message: "Phone number already registered".into(),
        };
        assert_eq!(err.user_message(), "Phone number already registered");
        assert!(AppError::NetworkUnreachable("x".into())
            .user_message()
            .starts_with("Unable to connect"));
    }
}
