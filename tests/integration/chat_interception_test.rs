//! Chat-completion interception through the public façade.

#[path = "../common.rs"]
mod common;

use common::{CannedChat, ChatRequest};
use futures::StreamExt;
use llm_observe::{CHAT_METHOD, CallOutput, ChatCompletions, STREAM_SENTINEL};
use serde_json::json;

#[tokio::test]
async fn test_completion_is_returned_and_recorded() {
    let (observer, transport) = common::memory_observer();
    let client = observer.instrument_chat(CannedChat::hello());

    let output = client
        .create(ChatRequest::user("gpt-4", "Hi"))
        .await
        .unwrap();
    let completion = output.into_complete().unwrap();
    assert_eq!(completion["choices"][0]["message"]["content"], "hello");

    let deliveries = transport.deliveries().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].endpoint, "http://localhost:9999/llm-logs");
    assert_eq!(deliveries[0].token, common::TEST_TOKEN);

    let record = &deliveries[0].record;
    assert_eq!(record.method, CHAT_METHOD);
    assert_eq!(record.request_id.as_deref(), Some("cmpl_123"));
    assert_eq!(record.response.as_ref(), Some(&completion));
    assert_eq!(record.source.as_deref(), Some("openai"));
    assert!(record.timestamp.is_some());
    assert!(record.env.is_some());
}

#[tokio::test]
async fn test_stream_request_keeps_stream_intact() {
    let (observer, transport) = common::memory_observer();
    let client = observer.instrument_chat(CannedChat::new(json!({
        "choices": [{"message": {"content": "one two three"}}]
    })));

    let output = client
        .create(ChatRequest::user("gpt-4", "count").streaming())
        .await
        .unwrap();
    let CallOutput::Stream(words) = output else {
        panic!("expected a stream");
    };

    let record = &transport.records().await[0];
    assert_eq!(record.response, Some(json!(STREAM_SENTINEL)));
    assert!(record.request.is_streaming());
    assert!(record.request_id.is_none());

    assert_eq!(words.collect::<Vec<_>>().await, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_proxy_constructor_keeps_client_members() {
    let (observer, transport) = common::memory_observer();
    let constructor = observer.chat_constructor(|organization: &str| {
        let mut client = CannedChat::hello();
        client.organization = organization.to_string();
        client
    });

    let client = constructor.construct("org-42");
    assert!(client.is_observed());
    assert_eq!(client.organization, "org-42");

    client.create(ChatRequest::user("gpt-4", "Hi")).await.unwrap();
    assert_eq!(transport.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_calls_each_produce_a_record() {
    let (observer, transport) = common::memory_observer();
    let client = observer.instrument_chat(CannedChat::hello());

    let calls = (0..5).map(|i| client.create(ChatRequest::user("gpt-4", &format!("msg {i}"))));
    for output in futures::future::join_all(calls).await {
        assert!(output.unwrap().into_complete().is_some());
    }

    let records = transport.records().await;
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.is_success() && !r.is_stream()));
}
