//! Span events become Message items; exception events become one Exception
//! item.

use crate::model::{minimal_parse, ExceptionData, MessageData, Telemetry, TelemetryItem};
use crate::semconv;
use crate::span::{Attrs, SpanRecord};

use super::{common, SpanMapper};

/// Emits a telemetry item per unsuppressed event.
///
/// The first event carrying an exception type or message ends the span's
/// event processing: one Exception item is emitted when a stacktrace is
/// present, and later events are not visited at all.
pub(crate) fn export_events(
    mapper: &SpanMapper,
    span: &SpanRecord,
    operation_name: Option<&str>,
    sampling_percentage: f32,
    sink: &mut dyn FnMut(TelemetryItem),
) {
    let span_attrs = Attrs::new(&span.attributes);
    let scope_name = span.instrumentation_scope.name();

    for event in &span.events {
        if (mapper.event_suppressor)(event, scope_name) {
            continue;
        }

        let event_attrs = Attrs::new(&event.attributes);
        if event_attrs.string(semconv::EXCEPTION_TYPE).is_some()
            || event_attrs.string(semconv::EXCEPTION_MESSAGE).is_some()
        {
            if let Some(stacktrace) = event_attrs.string(semconv::EXCEPTION_STACKTRACE) {
                sink(build_exception(
                    mapper,
                    stacktrace,
                    span,
                    &span_attrs,
                    operation_name,
                    sampling_percentage,
                ));
            }
            return;
        }

        let mut item = TelemetryItem::new(Telemetry::Message(MessageData::default()));
        (mapper.telemetry_initializer)(&mut item);

        set_event_operation_tags(&mut item, span, &span_attrs, operation_name);
        common::set_time(&mut item, event.timestamp);
        common::set_extra_attributes(&mut item, &event.attributes);
        common::set_sample_rate(&mut item, sampling_percentage);

        item.data = Telemetry::Message(MessageData {
            message: event.name.to_string(),
        });
        sink(item);
    }
}

fn build_exception(
    mapper: &SpanMapper,
    stacktrace: &str,
    span: &SpanRecord,
    span_attrs: &Attrs<'_>,
    operation_name: Option<&str>,
    sampling_percentage: f32,
) -> TelemetryItem {
    let mut item = TelemetryItem::new(Telemetry::Exception(ExceptionData::default()));
    (mapper.telemetry_initializer)(&mut item);

    set_event_operation_tags(&mut item, span, span_attrs, operation_name);
    common::set_time(&mut item, span.end_time);
    common::set_sample_rate(&mut item, sampling_percentage);

    item.data = Telemetry::Exception(ExceptionData {
        exceptions: minimal_parse(stacktrace),
    });
    item
}

/// The span owns its events, so the span's id becomes the parent id.
fn set_event_operation_tags(
    item: &mut TelemetryItem,
    span: &SpanRecord,
    span_attrs: &Attrs<'_>,
    operation_name: Option<&str>,
) {
    common::set_operation_id(item, span.span_context.trace_id());
    item.tags.insert(
        crate::model::ContextTagKey::OperationParentId,
        span.span_context.span_id().to_string(),
    );
    match operation_name {
        Some(operation_name) => common::set_operation_name(item, operation_name),
        None => common::set_operation_name_from_attributes(item, span_attrs),
    }
}
