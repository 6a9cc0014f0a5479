//! LLM call observation
//!
//! Records every call made through a chat-completion client or the four
//! generation functions and ships one structured record per call to a
//! collection endpoint, without changing what the caller sees.
//!
//! ```no_run
//! # async fn run() {
//! use llm_observe::Observer;
//!
//! let observer = Observer::from_env();
//! observer.enable();
//!
//! for record in observer.get_recent(10).await {
//!     println!("{} took {:.3}s", record.method, record.latency_seconds);
//! }
//! # }
//! ```

pub use llm_observe_core::{
    CallRecord, CallRequest, DEFAULT_SOURCE, ObserveConfig, ObserveError, Result, STREAM_SENTINEL,
    serialize,
};
pub use llm_observe_interceptor::{
    CHAT_METHOD, CHAT_SOURCE, CallOutput, ChatCompletions, GENERATION_SOURCE, GenerationFn,
    GenerationFunctions, GenerationKind, GenerationResult, InstallOutcome, MASKED_TOKEN,
    ObservedChat, ObservedConstructor, Observer, ObserverBuilder, ObserverStatus, TransportFactory,
    format_records, generation_fn, summarize,
};
pub use llm_observe_observability::{spans, tracing_setup};
pub use llm_observe_transport::{
    COLLECTION_PATH, Destination, HttpConfig, HttpTransport, InMemoryTransport, Transport,
    resolve_endpoint,
};
