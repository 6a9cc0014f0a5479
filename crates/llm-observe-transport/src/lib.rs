//! Delivery of call records to the remote collection endpoint.
//!
//! [`Transport`] implementations are allowed to fail; the [`Dispatcher`] on
//! top of them is not. Everything an observed call touches goes through the
//! dispatcher, so a broken collector can only ever cost a log entry.

#![forbid(unsafe_code)]

mod destination;
mod dispatch;
pub mod http;
mod memory;

use async_trait::async_trait;
use llm_observe_core::{CallRecord, Result};

pub use destination::{COLLECTION_PATH, Destination, resolve_endpoint};
pub use dispatch::{Dispatcher, MAX_DIAGNOSTIC_LEN};
pub use http::{HttpConfig, HttpTransport};
pub use memory::{Delivery, InMemoryTransport};

/// Tracing target for transport operations.
pub const TRACING_TARGET: &str = "llm_observe::transport";

/// Moves records between this process and a collector.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one record. A non-2xx answer is an error.
    async fn deliver(&self, destination: &Destination, record: &CallRecord) -> Result<()>;

    /// Fetches up to `limit` recent records.
    async fn fetch(&self, destination: &Destination, limit: usize) -> Result<Vec<CallRecord>>;
}
