//! The canonical record of one observed LLM call.

use std::collections::BTreeMap;
use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serialize::serialize;

/// Recorded in place of a response that is an unconsumed incremental stream.
pub const STREAM_SENTINEL: &str = "[stream]";

/// Source tag filled in when the producer did not set one.
pub const DEFAULT_SOURCE: &str = "llm-observe";

/// Environment variables captured with every record, when set.
///
/// Only provider routing details; credentials are never captured.
pub const ENV_SNAPSHOT_KEYS: [&str; 3] =
    ["OPENAI_BASE_URL", "OPENAI_ORGANIZATION", "OPENAI_PROJECT"];

/// Wire key holding positional arguments inside `request`.
///
/// Kept outside the identifier namespace so a named parameter called `args`
/// stays a named parameter.
pub const POSITIONAL_ARGS_KEY: &str = "$args";

/// Arguments of an observed call.
///
/// Named parameters are flattened into the serialized object, so a `prompt`
/// parameter appears as `request.prompt`. Positional arguments live under
/// [`POSITIONAL_ARGS_KEY`]; they are normally empty and are omitted from the
/// wire form when they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    #[serde(rename = "$args", default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,

    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl CallRequest {
    /// Captures call parameters.
    ///
    /// Parameters that serialize to an object become the named-parameter map;
    /// anything else is kept as a single positional argument.
    pub fn from_params<P>(params: &P) -> Self
    where
        P: Serialize + fmt::Debug + ?Sized,
    {
        match serialize(params) {
            Value::Object(params) => Self {
                args: Vec::new(),
                params,
            },
            Value::Null => Self::default(),
            other => Self {
                args: vec![other],
                params: Map::new(),
            },
        }
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn model(&self) -> Option<&str> {
        self.param("model").and_then(Value::as_str)
    }

    /// Whether the parameters ask for an incremental (streamed) response.
    pub fn is_streaming(&self) -> bool {
        self.param("stream")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// One intercepted invocation.
///
/// Once complete, exactly one of `response` and `error` is set. `timestamp`,
/// `source` and `env` are filled by [`CallRecord::fill_defaults`] only when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Dotted surface name, e.g. `chat.completions.create`.
    pub method: String,

    #[serde(default)]
    pub request: CallRequest,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock duration of the underlying call.
    #[serde(default)]
    pub latency_seconds: f64,

    /// Provider-issued identifier, when the result carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

impl CallRecord {
    /// Creates the skeleton of a record for a call that has not completed yet.
    pub fn new(method: impl Into<String>, request: CallRequest) -> Self {
        Self {
            method: method.into(),
            request,
            response: None,
            error: None,
            latency_seconds: 0.0,
            request_id: None,
            timestamp: None,
            source: None,
            env: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether the call has resolved one way or the other.
    pub fn is_complete(&self) -> bool {
        self.response.is_some() || self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.response.is_some() && self.error.is_none()
    }

    /// Whether the response is the streaming sentinel.
    pub fn is_stream(&self) -> bool {
        self.response.as_ref().and_then(Value::as_str) == Some(STREAM_SENTINEL)
    }

    /// Fills `timestamp`, `source` and `env` where they are not already set.
    pub fn fill_defaults(&mut self) {
        if self.timestamp.is_none() {
            self.timestamp = Some(Timestamp::now());
        }
        if self.source.is_none() {
            self.source = Some(DEFAULT_SOURCE.to_string());
        }
        if self.env.is_none() {
            self.env = Some(env_snapshot());
        }
    }
}

/// Captures the [`ENV_SNAPSHOT_KEYS`] that are set in the process environment.
pub fn env_snapshot() -> BTreeMap<String, String> {
    ENV_SNAPSHOT_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}
