//! Span helpers for the observation layer.
//!
//! All span names use the `llm_observe.` namespace prefix for low cardinality.
//! Record contents never go into span fields; only the surface name and the
//! model, which are safe to index.

use tracing::Span;

// Interception

/// Create span for one observed chat-completion call.
///
/// Children: deliver_record
#[inline]
pub fn chat_call(method: &str, model: Option<&str>) -> Span {
    tracing::debug_span!(
        "llm_observe.chat_call",
        method = method,
        model = model.unwrap_or("unknown"),
    )
}

/// Create span for one observed generation-function call.
///
/// Children: deliver_record
#[inline]
pub fn generation_call(method: &str, model: Option<&str>) -> Span {
    tracing::debug_span!(
        "llm_observe.generation_call",
        method = method,
        model = model.unwrap_or("unknown"),
    )
}

/// Create span for installing the observation layer.
#[inline]
pub fn install() -> Span {
    tracing::info_span!("llm_observe.install")
}

// Transport

/// Create span for delivering one record to the collector.
///
/// Parent: chat_call or generation_call
#[inline]
pub fn deliver_record(method: &str, endpoint: &str) -> Span {
    tracing::debug_span!(
        "llm_observe.deliver_record",
        method = method,
        endpoint = endpoint,
    )
}

/// Create span for querying recent records from the collector.
#[inline]
pub fn fetch_recent(endpoint: &str, limit: usize) -> Span {
    tracing::debug_span!(
        "llm_observe.fetch_recent",
        endpoint = endpoint,
        limit = limit,
    )
}
