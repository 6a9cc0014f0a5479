//! Fail-silent sending on top of a [`Transport`].

use llm_observe_core::text::truncate;
use llm_observe_core::{CallRecord, ObserveError};

use crate::{Destination, TRACING_TARGET, Transport};

/// Diagnostics about failed deliveries are cut to this many characters.
pub const MAX_DIAGNOSTIC_LEN: usize = 200;

/// Sends records and queries recent ones without ever failing.
///
/// A missing destination turns both operations into no-ops that never touch
/// the transport. Delivery and query failures are dropped; with `debug` set
/// they are reported as warnings first.
///
/// ```
/// # tokio_test::block_on(async {
/// use llm_observe_core::{CallRecord, CallRequest};
/// use llm_observe_transport::{Dispatcher, InMemoryTransport};
///
/// let transport = InMemoryTransport::new();
/// let record = CallRecord::new("generate.text", CallRequest::default());
///
/// // No destination configured: nothing is sent, nothing fails.
/// Dispatcher::new(&transport, None).send(record).await;
/// assert!(transport.is_empty().await);
/// # })
/// ```
pub struct Dispatcher<'a> {
    transport: &'a dyn Transport,
    destination: Option<&'a Destination>,
    debug: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn Transport, destination: Option<&'a Destination>) -> Self {
        Self {
            transport,
            destination,
            debug: false,
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Fills record defaults and delivers it. Always resolves.
    pub async fn send(&self, mut record: CallRecord) {
        record.fill_defaults();

        let Some(destination) = self.destination else {
            if self.debug {
                tracing::warn!(
                    target: TRACING_TARGET,
                    method = %record.method,
                    "Collection endpoint not configured, record dropped"
                );
            }
            return;
        };

        match self.transport.deliver(destination, &record).await {
            Ok(()) => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    method = %record.method,
                    "Record sent"
                );
            }
            Err(err) => self.report("Failed to deliver record", &err),
        }
    }

    /// Fetches up to `limit` records, most recent first. Empty on any failure.
    pub async fn recent(&self, limit: usize) -> Vec<CallRecord> {
        let Some(destination) = self.destination else {
            if self.debug {
                tracing::warn!(
                    target: TRACING_TARGET,
                    "Collection endpoint not configured, no records to fetch"
                );
            }
            return Vec::new();
        };

        match self.transport.fetch(destination, limit).await {
            Ok(mut records) => {
                // Stable: records without a timestamp keep collector order at the end.
                records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                records.truncate(limit);
                records
            }
            Err(err) => {
                self.report("Failed to fetch records", &err);
                Vec::new()
            }
        }
    }

    fn report(&self, message: &'static str, err: &ObserveError) {
        if self.debug {
            let error = err.to_string();
            tracing::warn!(
                target: TRACING_TARGET,
                error = %truncate(&error, MAX_DIAGNOSTIC_LEN),
                "{message}"
            );
        }
    }
}
