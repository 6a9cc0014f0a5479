//! Configuration consumed by the observation layer.
//!
//! Every value arrives as a plain string (usually from the environment). A
//! missing URL or token disables outbound traffic entirely; it is never an
//! error.

use serde::{Deserialize, Serialize};

/// Collection endpoint base URL.
pub const ENV_URL: &str = "LLM_OBSERVE_URL";
/// Bearer token sent to the collection endpoint.
pub const ENV_TOKEN: &str = "LLM_OBSERVE_TOKEN";
/// Enables diagnostics for dropped records and installation notes.
pub const ENV_DEBUG: &str = "LLM_OBSERVE_DEBUG";
/// Enables observation at startup.
pub const ENV_ENABLED: &str = "LLM_OBSERVE_ENABLED";
/// Timeout in seconds for a single delivery or query request.
pub const ENV_HTTP_TIMEOUT: &str = "LLM_OBSERVE_HTTP_TIMEOUT";

/// Default timeout for requests to the collector: 30 seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserveConfig {
    /// Base URL of the collector, with or without the collection path.
    #[serde(default)]
    pub url: Option<String>,

    /// Access token for the collector.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub enabled: bool,

    /// Delivery-path timeout in seconds; `0` means the default when the
    /// HTTP client is built.
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            debug: false,
            enabled: false,
            http_timeout: default_http_timeout(),
        }
    }
}

impl ObserveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Blank values count as absent. An unparsable timeout falls back to the
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            url: non_blank(ENV_URL).map(|v| v.trim().to_string()),
            token: non_blank(ENV_TOKEN).map(|v| v.trim().to_string()),
            debug: non_blank(ENV_DEBUG).is_some_and(|v| parse_flag(&v)),
            enabled: non_blank(ENV_ENABLED).is_some_and(|v| parse_flag(&v)),
            http_timeout: non_blank(ENV_HTTP_TIMEOUT)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Whether both a URL and a token are present.
    pub fn has_destination(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
            && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Interprets a plain-string boolean flag.
///
/// `1`, `true`, `yes` and `on` (any case) are truthy; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
