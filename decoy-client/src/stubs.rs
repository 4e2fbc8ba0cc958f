//! Inert client configuration stand-ins
//!
//! Code under test often pokes at a client's default headers or registers
//! interceptors at startup. The mock accepts both and applies neither.

use decoy_core::{Headers, Method};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default headers, shared and per verb
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderDefaults {
    pub common: Headers,
    pub per_method: IndexMap<Method, Headers>,
}

impl HeaderDefaults {
    /// Common headers overlaid with the ones for `method`
    pub fn for_method(&self, method: Method) -> Headers {
        let mut headers = self.common.clone();
        if let Some(specific) = self.per_method.get(&method) {
            headers.extend(specific.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        headers
    }
}

/// Client-wide defaults bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDefaults {
    pub headers: HeaderDefaults,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Handle returned by [`InterceptorManager::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(pub usize);

/// Interceptor registration point that never runs what it is given
#[derive(Debug, Default)]
pub struct InterceptorManager {
    next_id: AtomicUsize,
}

impl InterceptorManager {
    pub fn register<F>(&self, _handler: F) -> InterceptorId
    where
        F: Send + Sync + 'static,
    {
        let id = InterceptorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(id = id.0, "ignoring interceptor registration");
        id
    }

    pub fn eject(&self, id: InterceptorId) {
        tracing::trace!(id = id.0, "ignoring interceptor eject");
    }

    /// How many handlers have been registered
    pub fn registered(&self) -> usize {
        self.next_id.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub struct Interceptors {
    pub request: InterceptorManager,
    pub response: InterceptorManager,
}
