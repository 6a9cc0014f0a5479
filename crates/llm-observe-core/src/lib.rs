//! Core types shared by the llm-observe crates.
//!
//! This crate owns the canonical shape of one observed LLM call ([`CallRecord`]),
//! the best-effort [`serialize`] conversion used to capture arbitrary call
//! arguments and results, the [`ObserveConfig`] consumed by the other crates,
//! and the [`ObserveError`] taxonomy.

pub mod config;
pub mod error;
pub mod record;
pub mod serialize;
pub mod text;

pub use config::ObserveConfig;
pub use error::{ObserveError, Result};
pub use record::{
    CallRecord, CallRequest, DEFAULT_SOURCE, ENV_SNAPSHOT_KEYS, POSITIONAL_ARGS_KEY, STREAM_SENTINEL,
};
pub use serialize::serialize;

/// Tracing target for core operations.
pub const TRACING_TARGET: &str = "llm_observe::core";
