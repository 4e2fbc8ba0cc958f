//! Mock HTTP client
//!
//! [`MockHttpClient`] is what the code under test calls. Every call queues a
//! pending request on the shared [`MockQueue`] and records its arguments;
//! the test then inspects the queue and settles requests one at a time.
//!
//! ```ignore
//! let client = MockHttpClient::new();
//! let users = UserService::new(client.clone());
//!
//! let pending = users.fetch(1);
//! client.settle_success(ResponseOverrides::new().with_data(json!({"id": 1})), Selector::Oldest, false)?;
//! assert_eq!(pending.await?.id, 1);
//!
//! client.reset();
//! ```

use crate::calls::{CallLog, Operation, RecordedCall};
use crate::cancel;
use crate::client::{ClientFuture, HttpClient, shorthand};
use crate::stubs::{ClientDefaults, Interceptors};
use decoy_core::{
    HttpError, Method, MockConfig, MockQueue, MockResponse, PendingRequest, RequestConfig,
    RequestCriteria, ResponseFuture, ResponseOverrides, Selector, SettleError,
};
use futures::future::{BoxFuture, FutureExt, try_join_all};
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use std::future::IntoFuture;
use std::sync::Arc;

struct MockState {
    queue: MockQueue,
    calls: CallLog,
    defaults: RwLock<ClientDefaults>,
    interceptors: Interceptors,
}

/// Deterministic stand-in for an HTTP client
///
/// Clones share the same queue, call log and defaults.
#[derive(Clone)]
pub struct MockHttpClient {
    state: Arc<MockState>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            state: Arc::new(MockState {
                queue: MockQueue::with_config(config),
                calls: CallLog::new(),
                defaults: RwLock::new(ClientDefaults::default()),
                interceptors: Interceptors::default(),
            }),
        }
    }

    /// The queue backing this client
    pub fn queue(&self) -> &MockQueue {
        &self.state.queue
    }

    pub fn calls(&self) -> &CallLog {
        &self.state.calls
    }

    // === Inbound call surface ===

    /// Issue a request described by `config`
    pub fn call(&self, config: RequestConfig) -> ResponseFuture {
        self.record(RecordedCall::new(Operation::Call).with_config(Some(config.clone())));
        self.state.queue.create_request(config)
    }

    /// Issue a request to `url`, with the rest taken from `config`
    pub fn call_url(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.record(
            RecordedCall::new(Operation::Call)
                .with_url(url)
                .with_config(config.clone()),
        );
        let config = config.unwrap_or_default().with_url(url);
        self.state.queue.create_request(config)
    }

    /// Alias of [`Self::call`]
    pub fn request(&self, config: RequestConfig) -> ResponseFuture {
        self.record(RecordedCall::new(Operation::Request).with_config(Some(config.clone())));
        self.state.queue.create_request(config)
    }

    pub fn get(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.verb(Method::Get, url, None, config)
    }

    pub fn delete(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.verb(Method::Delete, url, None, config)
    }

    pub fn head(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.verb(Method::Head, url, None, config)
    }

    pub fn options(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.verb(Method::Options, url, None, config)
    }

    pub fn post(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> ResponseFuture {
        self.verb(Method::Post, url, data, config)
    }

    pub fn put(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> ResponseFuture {
        self.verb(Method::Put, url, data, config)
    }

    pub fn patch(
        &self,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> ResponseFuture {
        self.verb(Method::Patch, url, data, config)
    }

    /// Wait for every future; fails with the first failure observed.
    pub fn all<I>(&self, futures: I) -> BoxFuture<'static, Result<Vec<MockResponse>, HttpError>>
    where
        I: IntoIterator<Item = ResponseFuture>,
    {
        self.record(RecordedCall::new(Operation::All));
        try_join_all(futures.into_iter().map(IntoFuture::into_future)).boxed()
    }

    /// Returns a handle to this same mock; `config` is recorded and ignored.
    pub fn create(&self, config: Option<RequestConfig>) -> MockHttpClient {
        self.record(RecordedCall::new(Operation::Create).with_config(config));
        self.clone()
    }

    /// Whether `error` is a cancellation
    pub fn is_cancel(error: &HttpError) -> bool {
        cancel::is_cancel(error)
    }

    // === Stub configuration surface ===

    pub fn defaults(&self) -> ClientDefaults {
        self.state.defaults.read().clone()
    }

    pub fn update_defaults<F>(&self, update: F)
    where
        F: FnOnce(&mut ClientDefaults),
    {
        update(&mut self.state.defaults.write());
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.state.interceptors
    }

    // === Test-control surface ===

    pub fn settle_success(
        &self,
        response: impl Into<ResponseOverrides>,
        selector: impl Into<Selector>,
        silent: bool,
    ) -> Result<(), SettleError> {
        self.state.queue.settle_success(response, selector, silent)
    }

    pub fn settle_failure(
        &self,
        error: HttpError,
        selector: impl Into<Selector>,
        silent: bool,
    ) -> Result<(), SettleError> {
        self.state.queue.settle_failure(error, selector, silent)
    }

    pub fn settle_success_for(
        &self,
        criteria: &RequestCriteria,
        response: impl Into<ResponseOverrides>,
        silent: bool,
    ) -> Result<(), SettleError> {
        self.state
            .queue
            .settle_success_for(criteria, response, silent)
    }

    pub fn settle_failure_for(
        &self,
        criteria: &RequestCriteria,
        error: HttpError,
        silent: bool,
    ) -> Result<(), SettleError> {
        self.state.queue.settle_failure_for(criteria, error, silent)
    }

    pub fn respond(&self, response: impl Into<ResponseOverrides>) -> Result<(), SettleError> {
        self.state.queue.respond(response)
    }

    pub fn fail(&self, error: HttpError) -> Result<(), SettleError> {
        self.state.queue.fail(error)
    }

    pub fn pop_future(&self, selector: impl Into<Selector>) -> Option<ResponseFuture> {
        self.state.queue.pop_future(selector)
    }

    pub fn pop_request(&self, selector: impl Into<Selector>) -> Option<PendingRequest> {
        self.state.queue.pop_request(selector)
    }

    pub fn latest_entry(&self) -> Option<PendingRequest> {
        self.state.queue.latest_entry()
    }

    pub fn latest_future(&self) -> Option<ResponseFuture> {
        self.state.queue.latest_future()
    }

    pub fn find_by_url(&self, url: &str) -> Option<PendingRequest> {
        self.state.queue.find_by_url(url)
    }

    pub fn find_by_url_regex(&self, pattern: &Regex) -> Option<PendingRequest> {
        self.state.queue.find_by_url_regex(pattern)
    }

    pub fn find_by(&self, criteria: &RequestCriteria) -> Option<PendingRequest> {
        self.state.queue.find_by(criteria)
    }

    pub fn pending(&self) -> Vec<PendingRequest> {
        self.state.queue.queue()
    }

    pub fn pending_count(&self) -> usize {
        self.state.queue.pending_count()
    }

    /// Empty the queue and forget every recorded call.
    ///
    /// Outstanding futures are abandoned, not rejected. Defaults and
    /// interceptor registrations are kept.
    pub fn reset(&self) {
        self.state.queue.reset();
        let cleared = self.state.calls.clear();
        tracing::debug!(cleared, "reset mock client call log");
    }

    fn verb(
        &self,
        method: Method,
        url: &str,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> ResponseFuture {
        self.record(
            RecordedCall::new(Operation::from(method))
                .with_url(url)
                .with_data(data.clone())
                .with_config(config.clone()),
        );
        self.state
            .queue
            .create_request(shorthand(method, url, data, config))
    }

    fn record(&self, call: RecordedCall) {
        tracing::trace!(operation = %call.operation, url = ?call.url, "mock client call");
        self.state.calls.record(call);
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("pending", &self.pending_count())
            .field("calls", &self.state.calls.total_calls())
            .finish()
    }
}

impl HttpClient for MockHttpClient {
    fn request(&self, config: RequestConfig) -> ClientFuture {
        MockHttpClient::request(self, config).into_future()
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn get(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::get(self, url, config).into_future()
    }

    fn delete(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::delete(self, url, config).into_future()
    }

    fn head(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::head(self, url, config).into_future()
    }

    fn options(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::options(self, url, config).into_future()
    }

    fn post(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::post(self, url, data, config).into_future()
    }

    fn put(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::put(self, url, data, config).into_future()
    }

    fn patch(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        MockHttpClient::patch(self, url, data, config).into_future()
    }
}
