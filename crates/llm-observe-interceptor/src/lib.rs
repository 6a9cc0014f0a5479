//! Interception of LLM client calls.
//!
//! Two surfaces are observed:
//!
//! - chat completions, by decorating a client implementing
//!   [`ChatCompletions`] with [`ObservedChat`] (directly, or through an
//!   [`ObservedConstructor`] around the host's client constructor);
//! - the four generation functions, by handing them to
//!   [`Observer::wrap_generation_functions`] and using the returned copies.
//!
//! Every observed call yields one [`CallRecord`](llm_observe_core::CallRecord)
//! that is delivered before the call returns. The caller always gets back
//! exactly what the underlying implementation produced, errors and streams
//! included; a failing collector only costs the record.

pub mod call;
pub mod chat;
pub mod display;
pub mod generation;
pub mod observer;
mod state;

pub use call::{InvokingCall, PendingCall, extract_request_id};
pub use chat::{CHAT_METHOD, CHAT_SOURCE, CallOutput, ChatCompletions, ObservedChat, ObservedConstructor};
pub use display::format_records;
pub use generation::{
    GENERATION_SOURCE, GenerationFn, GenerationFunctions, GenerationKind, GenerationResult,
    generation_fn, summarize,
};
pub use observer::{
    InstallOutcome, MASKED_TOKEN, Observer, ObserverBuilder, ObserverStatus, TransportFactory,
    http_transport_factory,
};

/// Tracing target for interception operations.
pub const TRACING_TARGET: &str = "llm_observe::interceptor";
