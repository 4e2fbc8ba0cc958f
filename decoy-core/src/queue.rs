//! The mock request queue
//!
//! [`MockQueue`] owns the [`QueueStore`] and is the single entry point for
//! creating requests, inspecting them and settling them. Each operation takes
//! the store lock once, so creation, lookup and settlement never interleave.

use crate::config::MockConfig;
use crate::deferred::{ResponseFuture, deferred};
use crate::store::{QueueStore, QueuedRequest};
use crate::types::{EntryId, Method, PendingRequest, RequestConfig, RequestCriteria};
use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;

/// Queue of mock requests awaiting settlement
#[derive(Debug, Default)]
pub struct MockQueue {
    pub(crate) store: Mutex<QueueStore>,
    pub(crate) config: MockConfig,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            store: Mutex::new(QueueStore::new()),
            config,
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Queue a request and return its unsettled future.
    ///
    /// Always adds exactly one entry, even when an identical request is
    /// already pending.
    pub fn create_request(&self, config: RequestConfig) -> ResponseFuture {
        let (settler, future) = deferred();
        let request = PendingRequest {
            id: EntryId::new(),
            method: config.method,
            url: config.url.clone(),
            data: config.data.clone(),
            config,
            future: future.clone(),
        };
        let entry_id = request.id;
        let method = request.method;
        let url = request.url.clone();

        let pending = {
            let mut store = self.store.lock();
            store.append(QueuedRequest { request, settler });
            store.len()
        };

        tracing::debug!(%entry_id, %method, ?url, pending, "queued mock request");
        future
    }

    /// Queue a request from verb shorthand arguments.
    ///
    /// See [`RequestConfig::shorthand`] for how the arguments combine.
    pub fn create_request_with_shorthand(
        &self,
        method: Method,
        url: impl Into<String>,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> ResponseFuture {
        self.create_request(RequestConfig::shorthand(method, url, data, config))
    }

    /// Most recently queued request still pending
    pub fn latest_entry(&self) -> Option<PendingRequest> {
        self.store.lock().peek_newest().cloned()
    }

    /// Future of the most recently queued request still pending
    pub fn latest_future(&self) -> Option<ResponseFuture> {
        self.latest_entry().map(|r| r.future)
    }

    /// Newest pending request whose url is exactly `url`
    pub fn find_by_url(&self, url: &str) -> Option<PendingRequest> {
        self.store.lock().find_newest_by_url(url).cloned()
    }

    /// Newest pending request whose url matches `pattern`
    pub fn find_by_url_regex(&self, pattern: &Regex) -> Option<PendingRequest> {
        self.store
            .lock()
            .find_newest(|r| r.url.as_deref().is_some_and(|url| pattern.is_match(url)))
            .cloned()
    }

    /// Newest pending request matching `criteria`
    pub fn find_by(&self, criteria: &RequestCriteria) -> Option<PendingRequest> {
        self.store
            .lock()
            .find_newest(|r| criteria.matches(r))
            .cloned()
    }

    /// All pending requests, oldest first
    pub fn queue(&self) -> Vec<PendingRequest> {
        self.store.lock().snapshot()
    }

    pub fn pending_count(&self) -> usize {
        self.store.lock().len()
    }

    /// Drop every pending request without settling it.
    ///
    /// Futures already handed out stay pending forever.
    pub fn reset(&self) {
        let dropped = self.store.lock().clear_all();
        tracing::debug!(dropped, "reset mock queue");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_extracts_fields() {
        let queue = MockQueue::new();
        let config = RequestConfig::new()
            .with_method(Method::Post)
            .with_url("/users")
            .with_data(json!({"name": "ada"}))
            .with_header("authorization", "Bearer t");
        let future = queue.create_request(config.clone());

        let entry = queue.latest_entry().unwrap();
        assert_eq!(entry.method, Method::Post);
        assert_eq!(entry.url.as_deref(), Some("/users"));
        assert_eq!(entry.data, Some(json!({"name": "ada"})));
        assert_eq!(entry.config, config);
        assert_eq!(entry.future, future);
        assert!(!future.is_settled());
    }

    #[test]
    fn test_requests_are_never_merged() {
        let queue = MockQueue::new();
        for _ in 0..5 {
            queue.create_request(RequestConfig::new().with_url("/same"));
        }
        assert_eq!(queue.pending_count(), 5);

        let ids: Vec<EntryId> = queue.queue().iter().map(|r| r.id).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_queue_preserves_insertion_order() {
        let queue = MockQueue::new();
        let urls = ["/1", "/2", "/3", "/4"];
        for url in urls {
            queue.create_request(RequestConfig::new().with_url(url));
        }
        let seen: Vec<String> = queue.queue().into_iter().filter_map(|r| r.url).collect();
        assert_eq!(seen, urls);
    }

    #[test]
    fn test_shorthand_uses_config_only_with_data() {
        let queue = MockQueue::new();
        let config = RequestConfig::new()
            .with_header("x-test", "1")
            .with_url("/ignored");

        queue.create_request_with_shorthand(
            Method::Put,
            "/items/1",
            Some(json!({"qty": 2})),
            Some(config.clone()),
        );
        let with_data = queue.latest_entry().unwrap();
        assert_eq!(with_data.url.as_deref(), Some("/items/1"));
        assert_eq!(with_data.method, Method::Put);
        assert_eq!(
            with_data.config.headers.get("x-test").map(String::as_str),
            Some("1")
        );
        assert_eq!(with_data.config.url.as_deref(), Some("/items/1"));

        queue.create_request_with_shorthand(Method::Post, "/items", None, Some(config));
        let without_data = queue.latest_entry().unwrap();
        assert!(without_data.config.headers.is_empty());
        assert_eq!(without_data.data, None);
    }

    #[test]
    fn test_find_by_url_returns_newest_match() {
        let queue = MockQueue::new();
        assert!(queue.find_by_url("/users/1").is_none());

        queue.create_request(RequestConfig::new().with_url("/users/1"));
        queue.create_request(RequestConfig::new().with_url("/users/2"));
        let newest = queue.create_request(RequestConfig::new().with_url("/users/1"));

        let found = queue.find_by_url("/users/1").unwrap();
        assert_eq!(found.future, newest);
        assert!(queue.find_by_url("/users/3").is_none());
        assert_eq!(queue.pending_count(), 3);
    }

    #[test]
    fn test_find_by_url_regex_and_criteria() {
        let queue = MockQueue::new();
        queue.create_request(RequestConfig::new().with_url("/users/1"));
        queue.create_request(
            RequestConfig::new()
                .with_method(Method::Delete)
                .with_url("/users/2"),
        );
        queue.create_request(RequestConfig::new().with_url("/orders/9"));

        let pattern = Regex::new(r"^/users/\d+$").unwrap();
        let found = queue.find_by_url_regex(&pattern).unwrap();
        assert_eq!(found.url.as_deref(), Some("/users/2"));

        let criteria = RequestCriteria::url("/users/1").with_method(Method::Get);
        assert!(queue.find_by(&criteria).is_some());
        let criteria = RequestCriteria::url("/users/1").with_method(Method::Delete);
        assert!(queue.find_by(&criteria).is_none());
        let any_delete = RequestCriteria::default().with_method(Method::Delete);
        assert_eq!(
            queue.find_by(&any_delete).unwrap().url.as_deref(),
            Some("/users/2")
        );
    }

    #[test]
    fn test_with_config_is_exposed() {
        let queue = MockQueue::with_config(MockConfig::default().with_silent_by_default(true));
        assert!(queue.config().silent_by_default);
        assert_eq!(queue.config().response.status, 200);
        assert!(!MockQueue::new().config().silent_by_default);
    }

    #[test]
    fn test_latest_future_and_reset() {
        let queue = MockQueue::new();
        assert!(queue.latest_future().is_none());

        queue.create_request(RequestConfig::new().with_url("/a"));
        let b = queue.create_request(RequestConfig::new().with_url("/b"));
        assert_eq!(queue.latest_future(), Some(b.clone()));

        queue.reset();
        assert_eq!(queue.pending_count(), 0);
        assert!(queue.latest_entry().is_none());
        assert!(!b.is_settled());

        queue.reset();
        assert_eq!(queue.pending_count(), 0);
    }
}
