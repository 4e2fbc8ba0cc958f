//! Call tracking for the mock client surface
//!
//! One recorder per exposed operation, cleared together on reset.

use decoy_core::{Method, RequestConfig};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// An operation exposed by [`crate::MockHttpClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Call,
    Request,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    All,
    Create,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Self::Call,
        Self::Request,
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
        Self::All,
        Self::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Request => "request",
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::All => "all",
            Self::Create => "create",
        }
    }
}

impl From<Method> for Operation {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::Get,
            Method::Post => Self::Post,
            Method::Put => Self::Put,
            Method::Patch => Self::Patch,
            Method::Delete => Self::Delete,
            Method::Head => Self::Head,
            Method::Options => Self::Options,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of one recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub url: Option<String>,
    pub data: Option<Value>,
    pub config: Option<RequestConfig>,
}

impl RecordedCall {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            url: None,
            data: None,
            config: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_data(mut self, data: Option<Value>) -> Self {
        self.data = data;
        self
    }

    pub fn with_config(mut self, config: Option<RequestConfig>) -> Self {
        self.config = config;
        self
    }
}

/// Recorded invocations, per operation
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<HashMap<Operation, Vec<RecordedCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .entry(call.operation)
            .or_default()
            .push(call);
    }

    /// Invocations of `operation`, oldest first
    pub fn calls(&self, operation: Operation) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .get(&operation)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_call(&self, operation: Operation) -> Option<RecordedCall> {
        self.calls
            .lock()
            .get(&operation)
            .and_then(|calls| calls.last().cloned())
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls.lock().get(&operation).map_or(0, Vec::len)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().map(Vec::len).sum()
    }

    /// Forget every recorded invocation. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut calls = self.calls.lock();
        let dropped = calls.values().map(Vec::len).sum();
        calls.clear();
        dropped
    }
}
