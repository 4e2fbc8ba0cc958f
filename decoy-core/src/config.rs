//! Configuration for the mock queue

use crate::error::ConfigError;
use crate::types::Headers;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields filled into a success response when the test omits them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseDefaults {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub data: Value,
}

impl Default for ResponseDefaults {
    fn default() -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: Headers::new(),
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Top-level mock configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub response: ResponseDefaults,
    /// Silent mode used by the `*_default` settle helpers
    pub silent_by_default: bool,
}

impl MockConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_response_defaults(mut self, response: ResponseDefaults) -> Self {
        self.response = response;
        self
    }

    pub fn with_silent_by_default(mut self, silent: bool) -> Self {
        self.silent_by_default = silent;
        self
    }
}
