//! decoy-core - Pending-request queue and settlement engine (no I/O deps)
//!
//! Mock requests are queued in creation order, each with a deferred
//! [`ResponseFuture`]. Tests look requests up, then settle them one by one
//! with a response or an error, driving the code under test through both
//! branches of its async flow without any real network or timing.
//!
//! Key types:
//! - [`MockQueue`] - owns the queue; create, inspect, settle, reset
//! - [`Selector`] - which pending request an operation applies to
//! - [`ResponseFuture`] / [`Settler`] - the two halves of a deferred
//! - [`ResponseOverrides`] - partial response filled from [`ResponseDefaults`]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod deferred;
pub mod error;
pub mod locator;
pub mod queue;
mod settle;
pub mod store;
pub mod types;

pub use config::{MockConfig, ResponseDefaults};
pub use deferred::{HttpResult, ResponseFuture, Settler, deferred};
pub use error::{Cancel, ConfigError, HttpError, SettleError};
pub use locator::{Selector, locate};
pub use queue::MockQueue;
pub use store::{QueueStore, QueuedRequest};
pub use types::{
    EntryId, FutureId, Headers, Method, MockResponse, PendingRequest, RequestConfig,
    RequestCriteria, ResponseOverrides,
};
