//! Per-call state machine shared by both interception surfaces.
//!
//! A call is *pending* once its arguments are captured, *invoking* from the
//! instant right before delegation, and ends as exactly one completed
//! [`CallRecord`]. Each transition consumes the previous state, so a record
//! can only be completed once.

use std::fmt;
use std::time::Instant;

use llm_observe_core::{CallRecord, CallRequest, STREAM_SENTINEL};
use serde::Serialize;
use serde_json::Value;

/// Record skeleton built from the call arguments.
#[derive(Debug)]
pub struct PendingCall {
    record: CallRecord,
}

impl PendingCall {
    pub fn begin<P>(method: impl Into<String>, source: &str, params: &P) -> Self
    where
        P: Serialize + fmt::Debug + ?Sized,
    {
        Self {
            record: CallRecord::new(method, CallRequest::from_params(params)).with_source(source),
        }
    }

    pub fn method(&self) -> &str {
        &self.record.method
    }

    pub fn request(&self) -> &CallRequest {
        &self.record.request
    }

    /// Starts the clock. Call immediately before delegating.
    pub fn invoke(self) -> InvokingCall {
        InvokingCall {
            record: self.record,
            started: Instant::now(),
        }
    }
}

/// A call whose underlying implementation is running.
#[derive(Debug)]
pub struct InvokingCall {
    record: CallRecord,
    started: Instant,
}

impl InvokingCall {
    pub fn succeed(self, response: Value, request_id: Option<String>) -> CallRecord {
        let mut record = self.finish();
        record.response = Some(response);
        record.request_id = request_id;
        record
    }

    /// Completes a call whose result is an unconsumed stream.
    pub fn succeed_streaming(self) -> CallRecord {
        let mut record = self.finish();
        record.response = Some(Value::String(STREAM_SENTINEL.to_string()));
        record
    }

    pub fn fail<E>(self, error: &E) -> CallRecord
    where
        E: fmt::Display + ?Sized,
    {
        let mut record = self.finish();
        record.error = Some(error.to_string());
        record
    }

    fn finish(self) -> CallRecord {
        let mut record = self.record;
        record.latency_seconds = self.started.elapsed().as_secs_f64();
        record
    }
}

/// Provider-issued id: top-level `id`, else `response.id`.
pub fn extract_request_id(value: &Value) -> Option<String> {
    [value.get("id"), value.pointer("/response/id")]
        .into_iter()
        .flatten()
        .find_map(|id| match id {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}
