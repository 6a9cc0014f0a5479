//! Generation-function interception through the public façade.

#[path = "../common.rs"]
mod common;

use common::{ProviderError, failing_generation, ok_text_generation};
use llm_observe::{GenerationFunctions, GenerationKind, Observer, generation_fn};
use serde_json::{Value, json};

const KINDS: [GenerationKind; 4] = [
    GenerationKind::GenerateText,
    GenerationKind::StreamText,
    GenerationKind::GenerateObject,
    GenerationKind::StreamObject,
];

fn table() -> GenerationFunctions<Value, Value, ProviderError> {
    GenerationFunctions::new()
        .with(GenerationKind::GenerateText, ok_text_generation())
        .with(
            GenerationKind::StreamText,
            generation_fn(|_params: Value| async {
                Ok::<_, ProviderError>(json!({"textStream": "<handle>", "text": "pending"}))
            }),
        )
        .with(
            GenerationKind::GenerateObject,
            generation_fn(|_params: Value| async {
                Ok::<_, ProviderError>(json!({"object": {"city": "Paris"}, "finishReason": "stop"}))
            }),
        )
        .with(
            GenerationKind::StreamObject,
            failing_generation("model overloaded"),
        )
}

#[tokio::test]
async fn test_every_kind_is_recorded_under_its_method() {
    let (observer, transport) = common::memory_observer();
    let wrapped = observer.wrap_generation_functions(table());

    for kind in KINDS {
        let function = wrapped.get(kind).unwrap();
        let _ = function(json!({"model": "gpt-4o", "prompt": "hi"})).await;
    }

    let records = transport.records().await;
    let methods: Vec<&str> = records.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(
        methods,
        vec!["generate.text", "stream.text", "generate.object", "stream.object"]
    );
    assert!(records.iter().all(|r| r.source.as_deref() == Some("ai-sdk")));

    assert_eq!(
        records[0].response,
        Some(json!({"text": "ok", "usage": {"totalTokens": 2}, "finishReason": "stop"}))
    );
    assert_eq!(records[1].response, Some(json!("[stream]")));
    assert_eq!(
        records[2].response,
        Some(json!({"object": {"city": "Paris"}, "finishReason": "stop"}))
    );
    assert_eq!(records[3].error.as_deref(), Some("model overloaded"));
}

#[tokio::test]
async fn test_wrapped_stream_result_is_returned_whole() {
    let (observer, _transport) = common::memory_observer();
    let wrapped = observer.wrap_generation_functions(table());

    let stream_text = wrapped.get(GenerationKind::StreamText).unwrap();
    let result = stream_text(json!({"prompt": "hi"})).await.unwrap();
    assert_eq!(result, json!({"textStream": "<handle>", "text": "pending"}));
}

#[tokio::test]
async fn test_partial_table_stays_partial() {
    let (observer, _transport) = common::memory_observer();
    let wrapped = observer.wrap_generation_functions(
        GenerationFunctions::new().with(GenerationKind::GenerateText, ok_text_generation()),
    );

    assert_eq!(wrapped.len(), 1);
    assert!(wrapped.get(GenerationKind::StreamObject).is_none());
}

#[tokio::test]
async fn test_originals_stay_unobserved() {
    let (observer, transport) = common::memory_observer();
    let originals = table();
    let wrapped = observer.wrap_generation_functions(originals.clone());

    let original = originals.get(GenerationKind::GenerateText).unwrap();
    original(json!({"prompt": "direct"})).await.unwrap();
    assert!(transport.is_empty().await);

    let observed = wrapped.get(GenerationKind::GenerateText).unwrap();
    observed(json!({"prompt": "wrapped"})).await.unwrap();
    assert_eq!(transport.len().await, 1);
}

#[tokio::test]
async fn test_not_installed_observer_wraps_nothing() {
    let observer = Observer::builder()
        .url("http://localhost:9999")
        .token(common::TEST_TOKEN)
        .build();
    let originals = table();
    let wrapped = observer.wrap_generation_functions(originals.clone());

    for kind in KINDS {
        let (Some(original), Some(returned)) = (originals.get(kind), wrapped.get(kind)) else {
            panic!("missing {kind}");
        };
        assert!(std::sync::Arc::ptr_eq(original, returned));
    }
}
