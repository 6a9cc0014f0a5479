//! Tracing setup and span helpers shared by the llm-observe crates.

pub mod spans;
pub mod tracing_setup;
