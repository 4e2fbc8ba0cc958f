//! Request and response types
//!
//! These are the shapes that flow through the queue: the configuration a
//! caller hands to the mock client, the entry recorded for it, and the
//! response a test settles it with.

use crate::config::ResponseDefaults;
use crate::deferred::ResponseFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Header bag, kept in insertion order.
pub type Headers = IndexMap<String, String>;

/// HTTP verb carried by a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }

    /// Whether the shorthand form of this verb takes a payload.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new ID using UUID v7
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Parse from string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a queued request entry
    EntryId
);

uuid_id!(
    /// Identity of a deferred response future
    FutureId
);

/// Configuration passed by the caller with a request
///
/// The queue only looks at `method`, `url` and `data`. Everything else is
/// carried through untouched so tests can assert on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Any other caller-defined fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set an arbitrary caller-defined field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build the config for a verb shorthand call.
    ///
    /// `config` is only used when `data` is also given; otherwise the request
    /// starts from an empty config. `method`, `url` and `data` always
    /// overwrite whatever the config carried.
    pub fn shorthand(
        method: Method,
        url: impl Into<String>,
        data: Option<Value>,
        config: Option<RequestConfig>,
    ) -> Self {
        let mut base = match (&data, config) {
            (Some(_), Some(config)) => config,
            _ => Self::default(),
        };
        base.method = method;
        base.url = Some(url.into());
        base.data = data;
        base
    }
}

/// An outstanding mock request, as seen by test code
///
/// `url` and `data` are copied out of `config` at creation time. `future` is
/// a handle onto the same deferred the caller received.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: EntryId,
    pub method: Method,
    pub url: Option<String>,
    pub data: Option<Value>,
    pub config: RequestConfig,
    pub future: ResponseFuture,
}

impl PendingRequest {
    pub fn future_id(&self) -> FutureId {
        self.future.id()
    }
}

/// Response a request settles with on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockResponse {
    pub config: RequestConfig,
    pub data: Value,
    pub headers: Headers,
    pub status: u16,
    pub status_text: String,
}

impl Default for MockResponse {
    fn default() -> Self {
        ResponseOverrides::default().fill(&ResponseDefaults::default())
    }
}

/// Partial response supplied by a test
///
/// Any field left as `None` is filled from [`ResponseDefaults`] when the
/// request is settled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RequestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl ResponseOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = Some(status_text.into());
        self
    }

    /// Fill every missing field from `defaults`. Supplied fields always win.
    pub fn fill(self, defaults: &ResponseDefaults) -> MockResponse {
        MockResponse {
            config: self.config.unwrap_or_default(),
            data: self.data.unwrap_or_else(|| defaults.data.clone()),
            headers: self.headers.unwrap_or_else(|| defaults.headers.clone()),
            status: self.status.unwrap_or(defaults.status),
            status_text: self
                .status_text
                .unwrap_or_else(|| defaults.status_text.clone()),
        }
    }
}

impl From<MockResponse> for ResponseOverrides {
    fn from(response: MockResponse) -> Self {
        Self {
            config: Some(response.config),
            data: Some(response.data),
            headers: Some(response.headers),
            status: Some(response.status),
            status_text: Some(response.status_text),
        }
    }
}

/// Criteria for picking the newest matching request
///
/// Unset fields match anything. Set `params` must equal the request's
/// query params exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCriteria {
    pub url: Option<String>,
    pub method: Option<Method>,
    pub params: Option<Map<String, Value>>,
}

impl RequestCriteria {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, request: &PendingRequest) -> bool {
        if let Some(url) = &self.url {
            if request.url.as_deref() != Some(url.as_str()) {
                return false;
            }
        }
        if let Some(method) = self.method {
            if request.method != method {
                return false;
            }
        }
        if let Some(params) = &self.params {
            if request.config.params != *params {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Display for RequestCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.url, self.method) {
            (Some(url), Some(method)) => write!(f, "{method} {url}"),
            (Some(url), None) => write!(f, "url {url}"),
            (None, Some(method)) => write!(f, "any {method} request"),
            (None, None) => f.write_str("any request"),
        }?;
        if let Some(params) = &self.params {
            write!(f, " with params {}", Value::Object(params.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overrides_fill_defaults() {
        let response = ResponseOverrides::new()
            .with_status(404)
            .fill(&ResponseDefaults::default());

        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.data, json!({}));
        assert!(response.headers.is_empty());
        assert_eq!(response.config, RequestConfig::default());
    }

    #[test]
    fn test_overrides_supplied_fields_win() {
        let response = ResponseOverrides::new()
            .with_data(json!({"id": 1}))
            .with_header("x-trace", "abc")
            .with_status_text("Created")
            .with_status(201)
            .fill(&ResponseDefaults::default());

        assert_eq!(response.data, json!({"id": 1}));
        assert_eq!(
            response.headers.get("x-trace").map(String::as_str),
            Some("abc")
        );
        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");
    }

    #[test]
    fn test_request_config_extra_fields_roundtrip() {
        let raw = json!({
            "url": "/users",
            "method": "post",
            "data": {"name": "ada"},
            "withCredentials": true
        });
        let config: RequestConfig = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(config.method, Method::Post);
        assert_eq!(config.url.as_deref(), Some("/users"));
        assert_eq!(config.extra.get("withCredentials"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn test_request_config_timeout_serializes_when_set() {
        let config = RequestConfig::new().with_url("/slow").with_timeout_ms(1500);
        assert_eq!(config.timeout_ms, Some(1500));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"method": "get", "url": "/slow", "timeout_ms": 1500})
        );
    }

    #[test]
    fn test_criteria_params_must_match_exactly() {
        let request = |params: &[(&str, Value)]| {
            let mut config = RequestConfig::new().with_url("/search");
            for (key, value) in params {
                config = config.with_param(*key, value.clone());
            }
            let (_settler, future) = crate::deferred::deferred();
            PendingRequest {
                id: EntryId::new(),
                method: config.method,
                url: config.url.clone(),
                data: None,
                config,
                future,
            }
        };
        let page_two = request(&[("q", json!("rust")), ("page", json!(2))]);
        let unpaged = request(&[("q", json!("rust"))]);

        let criteria = RequestCriteria::url("/search").with_param("q", "rust");
        assert!(criteria.matches(&unpaged));
        assert!(!criteria.matches(&page_two));
        assert!(RequestCriteria::url("/search").matches(&page_two));
        assert!(
            RequestCriteria::default()
                .with_params(Map::new())
                .matches(&request(&[]))
        );
        assert_eq!(
            criteria.with_method(Method::Get).to_string(),
            r#"get /search with params {"q":"rust"}"#
        );
    }

    #[test]
    fn test_method_display_is_lowercase() {
        assert_eq!(Method::Delete.to_string(), "delete");
        assert!(Method::Patch.has_body());
        assert!(!Method::Head.has_body());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
        assert_eq!(EntryId::parse(&a.to_string()).unwrap(), a);
    }
}
