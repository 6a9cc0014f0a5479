//! Reqwest-based transport.

use std::sync::Arc;

use async_trait::async_trait;
use llm_observe_core::text::truncate;
use llm_observe_core::{CallRecord, ObserveError, Result};
use llm_observe_observability::spans;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::Instrument;

use super::{Error, HttpConfig};
use crate::{Destination, MAX_DIAGNOSTIC_LEN, TRACING_TARGET, Transport};

/// Body of `GET {endpoint}?limit=n`.
///
/// Entries are kept raw so one malformed record cannot sink the whole page.
#[derive(Debug, Deserialize)]
struct LogsPage {
    #[serde(default)]
    logs: Vec<Value>,
}

impl LogsPage {
    /// Parses every entry that has the record shape, in page order.
    fn into_records(self) -> (Vec<CallRecord>, usize) {
        let total = self.logs.len();
        let records: Vec<CallRecord> = self
            .logs
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        let skipped = total - records.len();
        (records, skipped)
    }
}

struct HttpTransportInner {
    http: Client,
    config: HttpConfig,
}

/// Delivers records with one JSON `POST` each and queries them with `GET`.
///
/// No retries: a failed delivery is reported to the caller (normally the
/// [`Dispatcher`](crate::Dispatcher), which drops it).
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// Fails only when the underlying HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating HTTP transport"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| ObserveError::Install(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(HttpTransportInner { http, config }),
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.inner.config
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ObserveError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_DIAGNOSTIC_LEN).into_owned(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, destination: &Destination, record: &CallRecord) -> Result<()> {
        let span = spans::deliver_record(&record.method, destination.endpoint());
        self.post_record(destination, record).instrument(span).await
    }

    async fn fetch(&self, destination: &Destination, limit: usize) -> Result<Vec<CallRecord>> {
        let span = spans::fetch_recent(destination.endpoint(), limit);
        self.get_page(destination, limit).instrument(span).await
    }
}

impl HttpTransport {
    async fn post_record(&self, destination: &Destination, record: &CallRecord) -> Result<()> {
        let body = serde_json::to_vec(record).map_err(Error::Serde)?;

        let response = self
            .inner
            .http
            .post(destination.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(destination.token())
            .body(body)
            .send()
            .await
            .map_err(Error::from)?;

        let response = Self::check_status(response).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            status = response.status().as_u16(),
            "Record delivered"
        );
        Ok(())
    }

    async fn get_page(&self, destination: &Destination, limit: usize) -> Result<Vec<CallRecord>> {
        let response = self
            .inner
            .http
            .get(destination.endpoint())
            .query(&[("limit", limit)])
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(destination.token())
            .send()
            .await
            .map_err(Error::from)?;

        let response = Self::check_status(response).await?;
        let page: LogsPage = response.json().await.map_err(Error::from)?;
        let (records, skipped) = page.into_records();

        tracing::debug!(
            target: TRACING_TARGET,
            count = records.len(),
            skipped,
            "Fetched recent records"
        );
        Ok(records)
    }
}
