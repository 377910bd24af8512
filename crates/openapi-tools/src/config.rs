use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an OpenAPI-based tool source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSourceConfig {
    /// Absolute http(s) URL of the `OpenAPI` JSON document.
    pub spec_url: String,

    /// Override base URL from spec (`servers[0].url`).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds for tool calls. `None` or `0` leaves the HTTP client's
    /// default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Upper bound in seconds on fetching and parsing the spec at startup.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

impl Default for ToolSourceConfig {
    fn default() -> Self {
        Self {
            spec_url: String::new(),
            base_url: None,
            timeout_secs: None,
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }
}

fn default_startup_timeout_secs() -> u64 {
    30
}

impl ToolSourceConfig {
    #[must_use]
    pub fn new(spec_url: impl Into<String>) -> Self {
        Self {
            spec_url: spec_url.into(),
            ..Self::default()
        }
    }

    /// Effective per-call timeout (`0` means "no explicit timeout").
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            None | Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }

    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs.max(1))
    }
}
