//! Common test utilities and shared modules
//!
//! Fake collector, fake LLM clients and observer construction shared by the
//! root test suites.

#![allow(dead_code, unused_imports)]

#[path = "support/mod.rs"]
mod support_internal;

pub mod support {
    pub use super::support_internal::*;
}

pub use support::clients::*;
pub use support::collector::*;

use std::sync::Arc;

use llm_observe::{InMemoryTransport, Observer};

pub const TEST_TOKEN: &str = "test-token";

/// An enabled observer delivering to `base_url` over HTTP.
pub fn http_observer(base_url: &str) -> Observer {
    Observer::builder()
        .url(base_url)
        .token(TEST_TOKEN)
        .http_timeout(5)
        .enabled(true)
        .build()
}

/// An enabled observer recording into memory.
pub fn memory_observer() -> (Observer, Arc<InMemoryTransport>) {
    let transport = Arc::new(InMemoryTransport::new());
    let observer = Observer::builder()
        .url("http://localhost:9999")
        .token(TEST_TOKEN)
        .enabled(true)
        .transport(transport.clone())
        .build();
    (observer, transport)
}
