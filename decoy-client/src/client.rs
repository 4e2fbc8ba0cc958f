//! Client abstraction
//!
//! Code under test takes an `HttpClient` so tests can hand it a
//! [`crate::MockHttpClient`] instead of a real one.

use decoy_core::{HttpResult, Method, RequestConfig};
use futures::future::BoxFuture;
use serde_json::Value;

/// Future returned by every [`HttpClient`] operation
pub type ClientFuture = BoxFuture<'static, HttpResult>;

/// Abstraction over an asynchronous HTTP client
///
/// Implementations must register the request when the method is called,
/// not when the returned future is first polled.
pub trait HttpClient: Send + Sync {
    /// Issue a request described entirely by `config`
    fn request(&self, config: RequestConfig) -> ClientFuture;

    /// Get the client name (for logging/debugging)
    fn name(&self) -> &'static str;

    fn get(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Get, url, None, config))
    }

    fn delete(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Delete, url, None, config))
    }

    fn head(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Head, url, None, config))
    }

    fn options(&self, url: &str, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Options, url, None, config))
    }

    fn post(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Post, url, data, config))
    }

    fn put(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Put, url, data, config))
    }

    fn patch(&self, url: &str, data: Option<Value>, config: Option<RequestConfig>) -> ClientFuture {
        self.request(shorthand(Method::Patch, url, data, config))
    }
}

/// Shorthand config for `method`.
///
/// Verbs without a payload send an empty object so their config is kept.
pub(crate) fn shorthand(
    method: Method,
    url: &str,
    data: Option<Value>,
    config: Option<RequestConfig>,
) -> RequestConfig {
    let data = if method.has_body() {
        data
    } else {
        Some(Value::Object(serde_json::Map::new()))
    };
    RequestConfig::shorthand(method, url, data, config)
}
