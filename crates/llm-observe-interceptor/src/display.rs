//! Human-readable rendering of fetched records.
//!
//! A display convenience only; the wire format is [`CallRecord`]'s serde form.

use std::fmt::Write;

use llm_observe_core::CallRecord;
use llm_observe_core::text::truncate;
use serde_json::Value;

/// Renders at most `max_records` records, cutting every text field to
/// `text_width` characters.
pub fn format_records(records: &[CallRecord], max_records: usize, text_width: usize) -> String {
    if records.is_empty() {
        return "No records.\n".to_string();
    }

    let mut out = String::new();
    for (index, record) in records.iter().take(max_records).enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_record(&mut out, record, text_width);
    }

    let hidden = records.len().saturating_sub(max_records);
    if hidden > 0 {
        let _ = writeln!(out, "\n... {hidden} more record(s) not shown");
    }
    out
}

fn write_record(out: &mut String, record: &CallRecord, width: usize) {
    let timestamp = record
        .timestamp
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let source = record.source.as_deref().unwrap_or("-");
    let status = if record.error.is_some() { "ERROR" } else { "OK" };

    let _ = writeln!(
        out,
        "[{timestamp}] {} ({source}) {status} {:.3}s",
        record.method, record.latency_seconds
    );

    if let Some(model) = record.request.model() {
        let _ = writeln!(out, "  model:    {model}");
    }
    if let Some(id) = &record.request_id {
        let _ = writeln!(out, "  id:       {id}");
    }

    let request = compact(&serde_json::to_value(&record.request).unwrap_or(Value::Null));
    let _ = writeln!(out, "  request:  {}", truncate(&request, width));

    if let Some(response) = &record.response {
        let _ = writeln!(out, "  response: {}", truncate(&compact(response), width));
    }
    if let Some(error) = &record.error {
        let _ = writeln!(out, "  error:    {}", truncate(error, width));
    }
}

/// Strings print bare; everything else as compact JSON.
fn compact(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
