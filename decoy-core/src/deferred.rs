//! Deferred response futures
//!
//! A deferred is split in two: the [`Settler`] stays with the queue and the
//! [`ResponseFuture`] goes to the caller. The settler is consumed by
//! `resolve`/`reject`, so a deferred settles at most once.
//!
//! The future is a cheap clonable handle. Every clone observes the same
//! outcome; the awaiting task sees it on its next poll after settlement.

use crate::error::HttpError;
use crate::types::{FutureId, MockResponse};
use futures::future::BoxFuture;
use std::future::IntoFuture;
use tokio::sync::watch;

/// Outcome of a mock request
pub type HttpResult = Result<MockResponse, HttpError>;

/// Create an unsettled deferred.
pub fn deferred() -> (Settler, ResponseFuture) {
    let id = FutureId::new();
    let (tx, rx) = watch::channel(None);
    (Settler { id, tx }, ResponseFuture { id, rx })
}

/// Write half of a deferred
pub struct Settler {
    id: FutureId,
    tx: watch::Sender<Option<HttpResult>>,
}

impl Settler {
    pub fn id(&self) -> FutureId {
        self.id
    }

    /// Settle as a success.
    pub fn resolve(self, response: MockResponse) {
        self.settle(Ok(response));
    }

    /// Settle as a failure.
    pub fn reject(self, error: HttpError) {
        self.settle(Err(error));
    }

    fn settle(self, outcome: HttpResult) {
        if self.tx.receiver_count() == 0 {
            tracing::trace!(future_id = %self.id, "settling deferred with no live handles");
        }
        let previous = self.tx.send_replace(Some(outcome));
        debug_assert!(previous.is_none(), "deferred {} settled twice", self.id);
    }
}

impl std::fmt::Debug for Settler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settler").field("id", &self.id).finish()
    }
}

/// Read half of a deferred
///
/// Await it (it implements [`IntoFuture`]) to get the outcome. If the
/// settler is dropped without settling, the future stays pending forever.
#[derive(Clone)]
pub struct ResponseFuture {
    id: FutureId,
    rx: watch::Receiver<Option<HttpResult>>,
}

impl ResponseFuture {
    pub fn id(&self) -> FutureId {
        self.id
    }

    /// Whether an outcome has been recorded
    pub fn is_settled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Peek at the outcome without awaiting
    pub fn try_outcome(&self) -> Option<HttpResult> {
        self.rx.borrow().clone()
    }
}

impl IntoFuture for ResponseFuture {
    type Output = HttpResult;
    type IntoFuture = BoxFuture<'static, HttpResult>;

    fn into_future(self) -> Self::IntoFuture {
        let mut rx = self.rx;
        Box::pin(async move {
            let outcome = match rx.wait_for(Option::is_some).await {
                Ok(settled) => (*settled).clone(),
                // Settler dropped unsettled: abandoned
                Err(_) => None,
            };
            match outcome {
                Some(outcome) => outcome,
                None => futures::future::pending().await,
            }
        })
    }
}

impl PartialEq for ResponseFuture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResponseFuture {}

impl std::fmt::Debug for ResponseFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseFuture")
            .field("id", &self.id)
            .field("settled", &self.is_settled())
            .finish()
    }
}
