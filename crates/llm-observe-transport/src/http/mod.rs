//! Reqwest-based transport to the collection endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_observe_transport::{Destination, HttpConfig, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new(HttpConfig::default())?;
//! let destination = Destination::new("http://localhost:9999", "token");
//! let recent = transport.fetch(&destination, 10).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::HttpTransport;
pub use config::HttpConfig;
pub use error::Error;
