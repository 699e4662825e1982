//! Flat JSON rendering of finished spans.
//!
//! Each exported span becomes one self-contained JSON object: ids in hex,
//! wall-clock start as RFC 3339, duration in milliseconds, and attributes as a
//! plain object. One object per line keeps the trace file greppable and easy to
//! load with `jq`.

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::SystemTime;

/// Renders spans as flat JSON records tagged with the service name.
pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Renders one span.
    ///
    /// ```json
    /// {
    ///   "service": "ecocampus",
    ///   "traceId": "…32 hex…",
    ///   "spanId": "…16 hex…",
    ///   "parentSpanId": null,
    ///   "name": "handle_message",
    ///   "kind": "internal",
    ///   "start": "2025-04-23T10:00:00.000Z",
    ///   "durationMs": 0.42,
    ///   "attributes": { "operation": "load articles" },
    ///   "events": [],
    ///   "status": { "code": "unset" }
    /// }
    /// ```
    pub fn format_span(&self, span: &SpanData) -> JsonValue {
        let parent = (span.parent_span_id != SpanId::INVALID)
            .then(|| format!("{:016x}", span.parent_span_id));

        let duration_ms = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default()
            .as_secs_f64()
            * 1000.0;

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "at": rfc3339(event.timestamp),
                    "attributes": attributes_object(&event.attributes),
                })
            })
            .collect();

        json!({
            "service": self.service,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "name": span.name,
            "kind": kind_name(&span.span_kind),
            "start": rfc3339(span.start_time),
            "durationMs": duration_ms,
            "attributes": attributes_object(&span.attributes),
            "events": events,
            "status": status_object(&span.status),
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("service", &self.service)
            .finish()
    }
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn status_object(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!({ "code": "unset" }),
        Status::Ok => json!({ "code": "ok" }),
        Status::Error { description } => json!({
            "code": "error",
            "message": description.to_string(),
        }),
    }
}

/// Attributes as a `{key: value}` object; later duplicates win.
fn attributes_object(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_become_a_flat_object() {
        let attributes = vec![
            KeyValue::new("operation", "load articles"),
            KeyValue::new("count", 3_i64),
            KeyValue::new("ok", true),
        ];
        assert_eq!(
            attributes_object(&attributes),
            json!({ "operation": "load articles", "count": 3, "ok": true })
        );
    }

    #[test]
    fn error_status_carries_message() {
        let status = Status::error("disk full");
        assert_eq!(
            status_object(&status),
            json!({ "code": "error", "message": "disk full" })
        );
        assert_eq!(status_object(&Status::Unset), json!({ "code": "unset" }));
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let time = SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(1_500);
        assert_eq!(rfc3339(time), "1970-01-01T00:00:01.500Z");
    }
}
