//! A fake collection endpoint served by axum on an ephemeral port.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// One POST as the collector saw it.
#[derive(Debug, Clone)]
pub struct Posted {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeCollector {
    pub base_url: String,
    posts: Arc<Mutex<Vec<Posted>>>,
    status: StatusCode,
}

impl FakeCollector {
    /// Starts a collector that accepts every record.
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::CREATED).await
    }

    /// Starts a collector that answers every request with `status`.
    pub async fn start_with_status(status: StatusCode) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let collector = Self {
            base_url: format!("http://{addr}"),
            posts: Arc::new(Mutex::new(Vec::new())),
            status,
        };

        let router = Router::new()
            .route("/llm-logs", get(list).post(collect))
            .with_state(collector.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        collector
    }

    pub fn endpoint(&self) -> String {
        format!("{}/llm-logs", self.base_url)
    }

    pub async fn posts(&self) -> Vec<Posted> {
        self.posts.lock().await.clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn collect(
    State(collector): State<FakeCollector>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    collector.posts.lock().await.push(Posted {
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        body,
    });
    collector.status
}

/// Answers with the newest `limit` records first, like the real collector.
async fn list(
    State(collector): State<FakeCollector>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !collector.status.is_success() {
        return (collector.status, Json(json!({"error": "unavailable"})));
    }

    let limit = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(usize::MAX);
    let posts = collector.posts.lock().await;
    let logs: Vec<Value> = posts
        .iter()
        .rev()
        .take(limit)
        .map(|p| p.body.clone())
        .collect();
    (StatusCode::OK, Json(json!({ "logs": logs })))
}
