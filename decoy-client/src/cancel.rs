//! Cancellation stand-in
//!
//! Mirrors the shape of a real client's cancel token closely enough for code
//! under test to create, pass around and trigger one. The mock never cancels
//! requests by itself; tests settle a request with
//! [`HttpError::Cancelled`] to simulate it.

use decoy_core::{Cancel, HttpError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    reason: Arc<Mutex<Option<Cancel>>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token and hand its canceller to `executor`.
    pub fn with_executor<F>(executor: F) -> Self
    where
        F: FnOnce(Canceller),
    {
        let token = Self::new();
        executor(Canceller {
            token: token.clone(),
        });
        token
    }

    /// Create a token together with its canceller.
    pub fn source() -> CancelTokenSource {
        let token = Self::new();
        CancelTokenSource {
            canceller: Canceller {
                token: token.clone(),
            },
            token,
        }
    }

    pub fn reason(&self) -> Option<Cancel> {
        self.reason.lock().clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason.lock().is_some()
    }

    /// Fail with the cancellation if one was requested.
    pub fn throw_if_requested(&self) -> Result<(), HttpError> {
        match self.reason() {
            Some(cancel) => Err(HttpError::Cancelled(cancel)),
            None => Ok(()),
        }
    }

    // First cancellation wins
    fn cancel(&self, message: Option<String>) -> bool {
        let mut reason = self.reason.lock();
        if reason.is_some() {
            return false;
        }
        *reason = Some(Cancel { message });
        true
    }
}

/// Trigger half of a [`CancelToken`]
#[derive(Debug, Clone)]
pub struct Canceller {
    token: CancelToken,
}

impl Canceller {
    /// Request cancellation. Returns false if it was already requested.
    pub fn cancel(&self, message: impl Into<String>) -> bool {
        self.token.cancel(Some(message.into()))
    }

    pub fn cancel_silently(&self) -> bool {
        self.token.cancel(None)
    }
}

/// A token with its canceller
#[derive(Debug, Clone)]
pub struct CancelTokenSource {
    pub token: CancelToken,
    pub canceller: Canceller,
}

impl CancelTokenSource {
    pub fn cancel(&self, message: impl Into<String>) -> bool {
        self.canceller.cancel(message)
    }
}

/// Whether `error` is a cancellation
pub fn is_cancel(error: &HttpError) -> bool {
    error.is_cancel()
}
