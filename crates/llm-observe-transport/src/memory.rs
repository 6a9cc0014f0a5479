//! In-memory transport for hosts' tests and local inspection.

use async_trait::async_trait;
use llm_observe_core::{CallRecord, Result};
use tokio::sync::RwLock;

use crate::{Destination, Transport};

/// One record as it would have reached the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub endpoint: String,
    pub token: String,
    pub record: CallRecord,
}

/// Keeps every delivered record in memory, in delivery order.
pub struct InMemoryTransport {
    deliveries: RwLock<Vec<Delivery>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            deliveries: RwLock::new(Vec::new()),
        }
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.read().await.clone()
    }

    /// Delivered records, oldest first.
    pub async fn records(&self) -> Vec<CallRecord> {
        let deliveries = self.deliveries.read().await;
        deliveries.iter().map(|d| d.record.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.deliveries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.deliveries.read().await.is_empty()
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn deliver(&self, destination: &Destination, record: &CallRecord) -> Result<()> {
        let mut deliveries = self.deliveries.write().await;
        deliveries.push(Delivery {
            endpoint: destination.endpoint().to_string(),
            token: destination.token().to_string(),
            record: record.clone(),
        });
        Ok(())
    }

    /// Returns the most recent records first.
    async fn fetch(&self, destination: &Destination, limit: usize) -> Result<Vec<CallRecord>> {
        let deliveries = self.deliveries.read().await;
        Ok(deliveries
            .iter()
            .rev()
            .filter(|d| d.endpoint == destination.endpoint())
            .take(limit)
            .map(|d| d.record.clone())
            .collect())
    }
}
