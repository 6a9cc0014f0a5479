//! End-to-end tests against a real HTTP collector.
//!
//! Every test starts its own collector on an ephemeral port and observes
//! calls through an observer delivering to it over HTTP.

#[path = "../common.rs"]
mod common;

use axum::http::StatusCode;
use common::{CannedChat, ChatRequest, FakeCollector, failing_generation, ok_text_generation};
use llm_observe::{
    ChatCompletions, GenerationFunctions, GenerationKind, Observer, resolve_endpoint,
};
use serde_json::{Value, json};

#[tokio::test]
async fn test_chat_call_posts_one_record() {
    let collector = FakeCollector::start().await;
    let observer = common::http_observer(&collector.base_url);
    let client = observer.instrument_chat(CannedChat::hello());

    let request = ChatRequest::user("gpt-4", "Hi");
    client.create(request).await.unwrap();

    let posts = collector.posts().await;
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.authorization.as_deref(), Some("Bearer test-token"));
    assert_eq!(post.content_type.as_deref(), Some("application/json"));
    assert_eq!(post.body["method"], "chat.completions.create");
    assert_eq!(post.body["requestId"], "cmpl_123");
    assert_eq!(post.body["response"]["usage"]["total_tokens"], 2);
    assert_eq!(post.body["request"]["model"], "gpt-4");
    assert_eq!(post.body["request"]["messages"][0]["content"], "Hi");
    assert!(post.body.get("error").is_none());
    assert!(post.body["latencySeconds"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_generation_call_posts_prompt_and_text() {
    let collector = FakeCollector::start().await;
    let observer = common::http_observer(&collector.base_url);
    let wrapped = observer.wrap_generation_functions(
        GenerationFunctions::new().with(GenerationKind::GenerateText, ok_text_generation()),
    );

    let generate_text = wrapped.get(GenerationKind::GenerateText).unwrap();
    let result = generate_text(json!({"model": "gpt-4o", "prompt": "hi"}))
        .await
        .unwrap();
    assert_eq!(result["text"], "ok");

    let posts = collector.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].body["method"], "generate.text");
    assert_eq!(posts[0].body["request"]["prompt"], "hi");
    assert_eq!(posts[0].body["response"]["text"], "ok");
    assert_eq!(posts[0].body["source"], "ai-sdk");
}

#[tokio::test]
async fn test_failing_generation_rejects_and_posts_error() {
    let collector = FakeCollector::start().await;
    let observer = common::http_observer(&collector.base_url);
    let wrapped = observer.wrap_generation_functions(
        GenerationFunctions::new().with(
            GenerationKind::GenerateText,
            failing_generation("rate limit exceeded"),
        ),
    );

    let generate_text = wrapped.get(GenerationKind::GenerateText).unwrap();
    let err = generate_text(json!({"model": "gpt-4o", "prompt": "hi"}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "rate limit exceeded");

    let posts = collector.posts().await;
    assert_eq!(posts.len(), 1);
    let error = posts[0].body["error"].as_str().unwrap();
    assert!(error.contains("rate limit exceeded"));
    assert!(posts[0].body.get("response").is_none());
}

#[tokio::test]
async fn test_rejecting_collector_does_not_affect_calls() {
    let collector = FakeCollector::start_with_status(StatusCode::INTERNAL_SERVER_ERROR).await;
    let observer = common::http_observer(&collector.base_url);
    observer.set_debug(true);

    let client = observer.instrument_chat(CannedChat::hello());
    let output = client.create(ChatRequest::user("gpt-4", "Hi")).await.unwrap();
    assert_eq!(output.into_complete().unwrap()["id"], "cmpl_123");

    assert_eq!(collector.posts().await.len(), 1);
    assert!(observer.get_recent(10).await.is_empty());
}

#[tokio::test]
async fn test_get_recent_reads_back_records() {
    let collector = FakeCollector::start().await;
    let observer = common::http_observer(&collector.base_url);
    let wrapped = observer.wrap_generation_functions(
        GenerationFunctions::new().with(GenerationKind::GenerateText, ok_text_generation()),
    );
    let generate_text = wrapped.get(GenerationKind::GenerateText).unwrap();

    for prompt in ["first", "second", "third"] {
        generate_text(json!({"prompt": prompt})).await.unwrap();
    }

    let recent = observer.get_recent(2).await;
    assert_eq!(recent.len(), 2);
    assert!(recent[0].timestamp >= recent[1].timestamp);
    assert!(recent.iter().all(|r| r.method == "generate.text"));

    let prompts: Vec<&Value> = recent
        .iter()
        .filter_map(|r| r.request.param("prompt"))
        .collect();
    assert_eq!(prompts, vec![&json!("third"), &json!("second")]);
}

#[tokio::test]
async fn test_unreachable_collector_yields_empty_recent() {
    let observer = common::http_observer("http://127.0.0.1:9");
    assert!(observer.get_recent(5).await.is_empty());
}

#[tokio::test]
async fn test_configured_endpoint_is_used_as_is() {
    let collector = FakeCollector::start().await;
    let endpoint = collector.endpoint();
    assert_eq!(resolve_endpoint(&endpoint), endpoint);
    assert_eq!(resolve_endpoint(&format!("{}/", collector.base_url)), endpoint);

    let observer = common::http_observer(&endpoint);
    assert_eq!(observer.endpoint(), Some(endpoint.as_str()));

    let client = observer.instrument_chat(CannedChat::hello());
    client.create(ChatRequest::user("gpt-4", "Hi")).await.unwrap();
    assert_eq!(collector.posts().await.len(), 1);
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let collector = FakeCollector::start().await;
    let observer = Observer::builder()
        .url(collector.base_url.clone())
        .enabled(true)
        .build();

    let client = observer.instrument_chat(CannedChat::hello());
    client.create(ChatRequest::user("gpt-4", "Hi")).await.unwrap();

    assert!(collector.posts().await.is_empty());
    assert!(observer.get_recent(5).await.is_empty());
}
