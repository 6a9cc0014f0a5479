//! Where records go: the resolved collection endpoint and its access token.

use std::fmt;

use llm_observe_core::ObserveConfig;

/// Path segment of the collection endpoint.
pub const COLLECTION_PATH: &str = "/llm-logs";

/// Resolves a configured base URL to the collection endpoint.
///
/// A base that already ends with [`COLLECTION_PATH`] is returned as-is;
/// otherwise one trailing slash is stripped and the path appended. Resolving
/// an already resolved endpoint yields the same endpoint.
pub fn resolve_endpoint(base: &str) -> String {
    let base = base.trim();
    if base.ends_with(COLLECTION_PATH) {
        return base.to_string();
    }
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}{COLLECTION_PATH}")
}

/// A resolved endpoint plus the bearer token used to reach it.
#[derive(Clone, PartialEq, Eq)]
pub struct Destination {
    endpoint: String,
    token: String,
}

impl Destination {
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            endpoint: resolve_endpoint(base_url),
            token: token.into(),
        }
    }

    /// Builds the destination from configuration; `None` when the URL or the
    /// token is missing or blank.
    pub fn from_config(config: &ObserveConfig) -> Option<Self> {
        let url = config.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let token = config.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self::new(url, token))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("endpoint", &self.endpoint)
            .field("token", &"***")
            .finish()
    }
}
