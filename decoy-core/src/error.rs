//! Errors for decoy
//!
//! [`HttpError`] is the value a request future fails with. [`SettleError`] is
//! what the test-control surface returns when it has nothing to settle.

use crate::types::MockResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cancellation marker
///
/// A request failed with [`HttpError::Cancelled`] carries one of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub message: Option<String>,
}

impl Cancel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl std::fmt::Display for Cancel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "Cancel: {message}"),
            None => f.write_str("Cancel"),
        }
    }
}

/// Failure outcome of a mock request
///
/// Tests choose the value; the settlement engine passes it through as is.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum HttpError {
    /// The server answered with an error status
    #[error("Request failed with status code {}", .response.status)]
    Status { response: Box<MockResponse> },

    /// No response was received
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request was cancelled through a cancel token
    #[error("{0}")]
    Cancelled(Cancel),

    /// Arbitrary caller-supplied error value
    #[error("Request failed: {0}")]
    Custom(Value),
}

impl HttpError {
    pub fn status(response: MockResponse) -> Self {
        Self::Status {
            response: Box::new(response),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(Cancel::new(message))
    }

    pub fn custom(value: impl Into<Value>) -> Self {
        Self::Custom(value.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "http_status",
            Self::Network { .. } => "network",
            Self::Cancelled(_) => "cancelled",
            Self::Custom(_) => "custom",
        }
    }

    /// The response attached to a status failure
    pub fn response(&self) -> Option<&MockResponse> {
        match self {
            Self::Status { response } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// Status code of the attached response, if any
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Whether this failure is a cancellation
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl From<Cancel> for HttpError {
    fn from(cancel: Cancel) -> Self {
        Self::Cancelled(cancel)
    }
}

/// Errors from the test-control surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettleError {
    /// Nothing in the queue matched the selector
    #[error("No pending request matches {selector}")]
    NoPendingRequest { selector: String },
}

impl SettleError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPendingRequest { .. } => "no_pending_request",
        }
    }
}

/// Errors loading a [`crate::MockConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse mock config: {message}")]
    Parse { message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}
