//! Finished-span input record.

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::SystemTime;

use opentelemetry::trace::{Event, Link, SpanContext, SpanId, SpanKind, Status};
use opentelemetry::{Array, InstrumentationScope, KeyValue, Value};

/// A finished span presented for mapping.
///
/// Mirrors the data the SDK collects for an exported span, but is plainly
/// constructible so hosts can hand in spans from any pipeline and tests can
/// build fixtures directly; the SDK's own exporter input type cannot be
/// constructed outside the SDK.
#[derive(Clone, Debug)]
pub struct SpanRecord {
    /// Exportable span context.
    pub span_context: SpanContext,
    /// Parent span id, [`SpanId::INVALID`] for root spans.
    pub parent_span_id: SpanId,
    /// Span kind.
    pub span_kind: SpanKind,
    /// Span name.
    pub name: Cow<'static, str>,
    /// Span start time.
    pub start_time: SystemTime,
    /// Span end time.
    pub end_time: SystemTime,
    /// Span attributes.
    pub attributes: Vec<KeyValue>,
    /// Events recorded on the span, in recording order.
    pub events: Vec<Event>,
    /// Links recorded on the span, in recording order.
    pub links: Vec<Link>,
    /// Span status.
    pub status: Status,
    /// Instrumentation scope that produced the span.
    pub instrumentation_scope: InstrumentationScope,
}

impl SpanRecord {
    /// Adapts a batch element produced by the SDK span processor.
    ///
    /// Dropped-element counts are discarded; they play no role in the
    /// mapping.
    pub fn from_span_data(span: opentelemetry_sdk::trace::SpanData) -> Self {
        SpanRecord {
            span_context: span.span_context,
            parent_span_id: span.parent_span_id,
            span_kind: span.span_kind,
            name: span.name,
            start_time: span.start_time,
            end_time: span.end_time,
            attributes: span.attributes,
            events: span.events.events,
            links: span.links.links,
            status: span.status,
            instrumentation_scope: span.instrumentation_scope,
        }
    }

    pub(crate) fn parent_is_valid(&self) -> bool {
        self.parent_span_id != SpanId::INVALID
    }
}

/// Indexed, typed view over an attribute list.
///
/// Lookups mirror the typed-key semantics of the instrumentation API: a key
/// whose value has a different type than requested reads as absent. Later
/// duplicates win, matching SDK attribute merging.
pub(crate) struct Attrs<'a> {
    entries: HashMap<&'a str, &'a Value>,
}

impl<'a> Attrs<'a> {
    pub(crate) fn new(attributes: &'a [KeyValue]) -> Self {
        let mut entries = HashMap::with_capacity(attributes.len());
        for kv in attributes {
            entries.insert(kv.key.as_str(), &kv.value);
        }
        Attrs { entries }
    }

    pub(crate) fn string(&self, key: &str) -> Option<&'a str> {
        match self.entries.get(key) {
            Some(Value::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub(crate) fn int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(Value::I64(value)) => Some(*value),
            _ => None,
        }
    }

    /// First element of a string-array attribute.
    pub(crate) fn first_string_of_array(&self, key: &str) -> Option<&'a str> {
        match self.entries.get(key) {
            Some(Value::Array(Array::String(values))) => values.first().map(|v| v.as_str()),
            _ => None,
        }
    }
}
