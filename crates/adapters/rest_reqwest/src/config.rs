//! Schedule API configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the hub's REST API lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Base URL, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Timeout applied to every request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl RestConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
