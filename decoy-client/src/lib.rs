//! decoy-client - Mock HTTP client for deterministic async tests
//!
//! Hand [`MockHttpClient`] to the code under test in place of a real client.
//! Nothing touches the network: requests queue up until the test settles
//! them, so both the success and the failure branch of an async flow can be
//! driven step by step.

pub mod calls;
pub mod cancel;
pub mod client;
pub mod mock;
pub mod stubs;

pub use calls::{CallLog, Operation, RecordedCall};
pub use cancel::{CancelToken, CancelTokenSource, Canceller, is_cancel};
pub use client::{ClientFuture, HttpClient};
pub use mock::MockHttpClient;
pub use stubs::{ClientDefaults, HeaderDefaults, InterceptorId, InterceptorManager, Interceptors};

pub use decoy_core::{
    Cancel, HttpError, HttpResult, Method, MockConfig, MockResponse, PendingRequest, RequestConfig,
    RequestCriteria, ResponseDefaults, ResponseFuture, ResponseOverrides, Selector, SettleError,
};
