//! Human-readable rendering of records.

use llm_observe::{CallRecord, CallRequest, STREAM_SENTINEL, format_records};
use serde_json::json;

fn record(method: &str, prompt: &str) -> CallRecord {
    CallRecord::new(
        method,
        CallRequest::from_params(&json!({"model": "gpt-4o", "prompt": prompt})),
    )
    .with_source("ai-sdk")
    .with_timestamp("2024-05-01T12:00:00Z".parse().unwrap())
}

#[test]
fn test_streamed_record_shows_sentinel() {
    let mut streamed = record("stream.text", "hi");
    streamed.response = Some(json!(STREAM_SENTINEL));

    let out = format_records(&[streamed], 5, 80);
    assert!(out.contains("stream.text (ai-sdk) OK"));
    assert!(out.contains("  response: [stream]\n"));
}

#[test]
fn test_long_prompt_is_truncated() {
    let mut long = record("generate.text", &"word ".repeat(100));
    long.response = Some(json!({"text": "ok"}));

    let out = format_records(&[long], 5, 40);
    let request_line = out
        .lines()
        .find(|line| line.starts_with("  request:"))
        .unwrap();
    assert!(request_line.ends_with("..."));
    assert!(request_line.chars().count() <= "  request:  ".len() + 43);
}

#[test]
fn test_only_max_records_are_shown() {
    let records: Vec<CallRecord> = (0..5)
        .map(|i| {
            let mut r = record("generate.text", &format!("prompt {i}"));
            r.request_id = Some(format!("resp_{i}"));
            r.response = Some(json!({"text": "ok"}));
            r
        })
        .collect();

    let out = format_records(&records, 3, 80);
    assert!(out.contains("resp_0"));
    assert!(out.contains("resp_2"));
    assert!(!out.contains("resp_3"));
    assert!(out.contains("... 2 more record(s) not shown"));
}

#[test]
fn test_failed_record_shows_error() {
    let mut failed = record("generate.object", "hi");
    failed.error = Some("rate limit exceeded".to_string());

    let out = format_records(&[failed], 5, 80);
    assert!(out.contains("generate.object (ai-sdk) ERROR"));
    assert!(out.contains("  error:    rate limit exceeded\n"));
    assert!(!out.contains("response:"));
}
