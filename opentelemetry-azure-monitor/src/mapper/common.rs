//! Field-setting shared by every telemetry kind.

use std::time::SystemTime;

use opentelemetry::trace::{Link, TraceId, TraceState};
use opentelemetry::{otel_warn, Array, KeyValue, StringValue, Value};
use serde::Serialize;

use crate::model::{formats, ContextTagKey, TelemetryItem};
use crate::semconv;
use crate::span::Attrs;

/// Reserved property carrying the serialized span links.
pub(crate) const MS_LINKS: &str = "_MS.links";

/// Attribute namespaces covered by dedicated schema fields; everything in
/// them is redacted from the free-form properties, except captured headers.
const STANDARD_ATTRIBUTE_PREFIXES: [&str; 12] = [
    "http.",
    "db.",
    "message.",
    "messaging.",
    "rpc.",
    "enduser.",
    "net.",
    "peer.",
    "exception.",
    "thread.",
    "faas.",
    "code.",
];

pub(crate) fn set_operation_tags(item: &mut TelemetryItem, span: &crate::SpanRecord, attrs: &Attrs<'_>) {
    set_operation_id(item, span.span_context.trace_id());
    if span.parent_is_valid() {
        item.tags.insert(
            ContextTagKey::OperationParentId,
            span.parent_span_id.to_string(),
        );
    }
    set_operation_name_from_attributes(item, attrs);
}

pub(crate) fn set_operation_id(item: &mut TelemetryItem, trace_id: TraceId) {
    item.tags
        .insert(ContextTagKey::OperationId, trace_id.to_string());
}

pub(crate) fn set_operation_name(item: &mut TelemetryItem, operation_name: &str) {
    item.tags
        .insert(ContextTagKey::OperationName, operation_name.to_string());
}

pub(crate) fn set_operation_name_from_attributes(item: &mut TelemetryItem, attrs: &Attrs<'_>) {
    if let Some(operation_name) = attrs.string(semconv::AI_OPERATION_NAME) {
        set_operation_name(item, operation_name);
    }
}

pub(crate) fn set_time(item: &mut TelemetryItem, time: SystemTime) {
    item.time = formats::format_time(time);
}

pub(crate) fn set_sample_rate(item: &mut TelemetryItem, sampling_percentage: f32) {
    if sampling_percentage != 100.0 {
        item.sample_rate = Some(sampling_percentage);
    }
}

/// The sampling percentage the sampler recorded in the trace state; 100
/// when absent. Malformed values count as absent.
pub(crate) fn sampling_percentage(trace_state: &TraceState) -> f32 {
    let Some(raw) = trace_state.get(semconv::TRACE_STATE_SAMPLING_PERCENTAGE) else {
        return 100.0;
    };
    match raw.parse::<f32>() {
        Ok(percentage) if (0.0..=100.0).contains(&percentage) => percentage,
        _ => {
            otel_warn!(
                name: "SpanMapper.InvalidSamplingPercentage",
                value = raw.to_string()
            );
            100.0
        }
    }
}

#[derive(Serialize)]
struct LinkRef {
    #[serde(rename = "operation_Id")]
    operation_id: String,
    id: String,
}

pub(crate) fn add_links(item: &mut TelemetryItem, links: &[Link]) {
    if links.is_empty() {
        return;
    }
    let refs: Vec<LinkRef> = links
        .iter()
        .map(|link| LinkRef {
            operation_id: link.span_context.trace_id().to_string(),
            id: link.span_context.span_id().to_string(),
        })
        .collect();
    if let Ok(json) = serde_json::to_string(&refs) {
        item.properties.insert(MS_LINKS.to_string(), json);
    }
}

/// Copies attributes without a dedicated schema field into the item's
/// free-form properties, promoting the handful of special cases to tags.
pub(crate) fn set_extra_attributes<'a>(
    item: &mut TelemetryItem,
    attributes: impl IntoIterator<Item = &'a KeyValue>,
) {
    for attribute in attributes {
        let key = attribute.key.as_str();
        if key.starts_with(semconv::INTERNAL_ATTRIBUTE_PREFIX) {
            continue;
        }
        if key == semconv::AZ_NAMESPACE
            || key == semconv::AZURE_SDK_MESSAGE_BUS_DESTINATION
            || key == semconv::AZURE_SDK_ENQUEUED_TIME
        {
            // Azure SDK bridge attributes; peer.address falls under the
            // "peer." redaction below.
            continue;
        }
        if key == semconv::KAFKA_RECORD_QUEUE_TIME_MS || key == semconv::KAFKA_OFFSET {
            continue;
        }
        if key == semconv::AI_REQUEST_CONTEXT {
            continue;
        }
        if key == semconv::ENDUSER_ID {
            if let Value::String(user_id) = &attribute.value {
                item.tags
                    .insert(ContextTagKey::UserId, user_id.as_str().to_string());
                continue;
            }
        }
        if key == semconv::HTTP_USER_AGENT {
            if let Value::String(user_agent) = &attribute.value {
                item.tags
                    .insert(ContextTagKey::UserAgent, user_agent.as_str().to_string());
                continue;
            }
        }
        if key == semconv::AI_PREVIEW_INSTRUMENTATION_KEY {
            if let Value::String(instrumentation_key) = &attribute.value {
                item.instrumentation_key = Some(instrumentation_key.as_str().to_string());
                continue;
            }
        }
        if key == semconv::AI_PREVIEW_SERVICE_NAME {
            if let Value::String(role) = &attribute.value {
                item.tags
                    .insert(ContextTagKey::CloudRole, role.as_str().to_string());
                continue;
            }
        }
        if key == semconv::AI_PREVIEW_SERVICE_INSTANCE_ID {
            if let Value::String(role_instance) = &attribute.value {
                item.tags.insert(
                    ContextTagKey::CloudRoleInstance,
                    role_instance.as_str().to_string(),
                );
                continue;
            }
        }
        if key == semconv::AI_PREVIEW_SERVICE_VERSION {
            if let Value::String(version) = &attribute.value {
                item.tags.insert(
                    ContextTagKey::ApplicationVersion,
                    version.as_str().to_string(),
                );
                continue;
            }
        }
        if is_standard_attribute(key)
            && !key.starts_with(semconv::REQUEST_HEADER_PREFIX)
            && !key.starts_with(semconv::RESPONSE_HEADER_PREFIX)
        {
            continue;
        }
        if let Some(value) = attribute_value_string(&attribute.value) {
            item.properties.insert(key.to_string(), value);
        }
    }
}

fn is_standard_attribute(key: &str) -> bool {
    STANDARD_ATTRIBUTE_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// String form of an attribute value; array elements join with `", "`.
pub(crate) fn attribute_value_string(value: &Value) -> Option<String> {
    match value {
        Value::Bool(value) => Some(value.to_string()),
        Value::I64(value) => Some(value.to_string()),
        Value::F64(value) => Some(value.to_string()),
        Value::String(value) => Some(value.as_str().to_string()),
        Value::Array(array) => array_value_string(array),
        other => {
            otel_warn!(
                name: "SpanMapper.UnexpectedAttributeType",
                value = format!("{other:?}")
            );
            None
        }
    }
}

fn array_value_string(array: &Array) -> Option<String> {
    fn join<T: ToString>(values: &[T]) -> String {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
    match array {
        Array::Bool(values) => Some(join(values)),
        Array::I64(values) => Some(join(values)),
        Array::F64(values) => Some(join(values)),
        Array::String(values) => Some(
            values
                .iter()
                .map(StringValue::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => {
            otel_warn!(
                name: "SpanMapper.UnexpectedAttributeType",
                value = format!("{other:?}")
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MessageData, Telemetry};
    use opentelemetry::trace::{SpanContext, SpanId, TraceFlags};

    fn empty_item() -> TelemetryItem {
        TelemetryItem::new(Telemetry::Message(MessageData::default()))
    }

    #[test]
    fn standard_attributes_are_redacted_from_properties() {
        let mut item = empty_item();
        let attributes = vec![
            KeyValue::new("http.method", "GET"),
            KeyValue::new("db.statement", "SELECT 1"),
            KeyValue::new("custom.attribute", "kept"),
            KeyValue::new("thread.id", 7),
        ];
        set_extra_attributes(&mut item, &attributes);

        assert_eq!(item.properties.len(), 1);
        assert_eq!(
            item.properties.get("custom.attribute").map(String::as_str),
            Some("kept")
        );
    }

    #[test]
    fn captured_headers_survive_redaction() {
        let mut item = empty_item();
        let attributes = vec![
            KeyValue::new("http.request.header.x_custom", "value"),
            KeyValue::new("http.response.header.retry_after", "120"),
            KeyValue::new("http.url", "http://x"),
        ];
        set_extra_attributes(&mut item, &attributes);

        assert_eq!(item.properties.len(), 2);
        assert!(item.properties.contains_key("http.request.header.x_custom"));
        assert!(item
            .properties
            .contains_key("http.response.header.retry_after"));
    }

    #[test]
    fn internal_and_bridge_attributes_are_dropped() {
        let mut item = empty_item();
        let attributes = vec![
            KeyValue::new("applicationinsights.internal.operation_name", "op"),
            KeyValue::new("az.namespace", "Microsoft.EventHub"),
            KeyValue::new("message_bus.destination", "events"),
            KeyValue::new("x-opt-enqueued-time", 1),
            KeyValue::new("kafka.record.queue_time_ms", 5),
            KeyValue::new("kafka.offset", 42),
        ];
        set_extra_attributes(&mut item, &attributes);

        assert!(item.properties.is_empty());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn special_cases_promote_to_tags() {
        let mut item = empty_item();
        let attributes = vec![
            KeyValue::new("enduser.id", "user-1"),
            KeyValue::new("http.user_agent", "curl/8"),
            KeyValue::new("ai.preview.service_name", "checkout"),
            KeyValue::new("ai.preview.service_instance_id", "checkout-0"),
            KeyValue::new("ai.preview.service_version", "1.2.3"),
            KeyValue::new("ai.preview.instrumentation_key", "ikey"),
        ];
        set_extra_attributes(&mut item, &attributes);

        assert_eq!(item.tags.get(&ContextTagKey::UserId).unwrap(), "user-1");
        assert_eq!(item.tags.get(&ContextTagKey::UserAgent).unwrap(), "curl/8");
        assert_eq!(item.tags.get(&ContextTagKey::CloudRole).unwrap(), "checkout");
        assert_eq!(
            item.tags.get(&ContextTagKey::CloudRoleInstance).unwrap(),
            "checkout-0"
        );
        assert_eq!(
            item.tags.get(&ContextTagKey::ApplicationVersion).unwrap(),
            "1.2.3"
        );
        assert_eq!(item.instrumentation_key.as_deref(), Some("ikey"));
        assert!(item.properties.is_empty());
    }

    #[test]
    fn array_values_join_with_comma() {
        let mut item = empty_item();
        let attributes = vec![KeyValue::new(
            "custom.codes",
            Value::Array(Array::I64(vec![1, 2, 3])),
        )];
        set_extra_attributes(&mut item, &attributes);

        assert_eq!(
            item.properties.get("custom.codes").map(String::as_str),
            Some("1, 2, 3")
        );
    }

    #[test]
    fn links_serialize_into_reserved_property() {
        let mut item = empty_item();
        let context = SpanContext::new(
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap(),
            TraceFlags::default(),
            false,
            TraceState::default(),
        );
        add_links(&mut item, &[Link::new(context, Vec::new(), 0)]);

        assert_eq!(
            item.properties.get(MS_LINKS).map(String::as_str),
            Some(
                "[{\"operation_Id\":\"4bf92f3577b34da6a3ce929d0e0e4736\",\
                 \"id\":\"00f067aa0ba902b7\"}]"
            )
        );
    }

    #[test]
    fn sampling_percentage_defaults_to_full() {
        assert_eq!(sampling_percentage(&TraceState::default()), 100.0);

        let trace_state = TraceState::from_key_value([("ai-internal-sp", "25")]).unwrap();
        assert_eq!(sampling_percentage(&trace_state), 25.0);

        let trace_state = TraceState::from_key_value([("ai-internal-sp", "garbage")]).unwrap();
        assert_eq!(sampling_percentage(&trace_state), 100.0);
    }

    #[test]
    fn sample_rate_only_set_when_not_full() {
        let mut item = empty_item();
        set_sample_rate(&mut item, 100.0);
        assert_eq!(item.sample_rate, None);

        set_sample_rate(&mut item, 25.0);
        assert_eq!(item.sample_rate, Some(25.0));
    }
}
