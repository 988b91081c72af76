//! Span-to-telemetry translation.
//!
//! [`SpanMapper`] classifies a finished span as a Request or a
//! RemoteDependency, fills the envelope through the shared field-setting
//! rules, and emits the span's events as Message or Exception items.

use std::fmt;

use opentelemetry::trace::{Event, SpanKind};
use thiserror::Error;

use crate::model::{
    formats, ContextTagKey, RemoteDependencyData, RequestData, Telemetry, TelemetryItem,
};
use crate::semconv;
use crate::span::{Attrs, SpanRecord};

pub(crate) mod common;
mod events;
mod semantics;

/// Instrumentation scopes whose parentless INTERNAL spans start a trace of
/// their own (scheduled jobs) and therefore map to a Request.
const SCHEDULING_SCOPE_PREFIX: &str = "io.opentelemetry.spring-scheduling-";

/// Measurement carrying the time a message spent enqueued before this
/// request started.
const TIME_SINCE_ENQUEUED: &str = "timeSinceEnqueued";

/// Errors produced by span mapping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The span kind has no defined mapping. Every kind the current
    /// instrumentation API can produce is covered, so this only fires if a
    /// new kind appears upstream; the affected span must be skipped by the
    /// caller, never coerced.
    #[error("span kind {0:?} has no telemetry mapping")]
    UnsupportedSpanKind(SpanKind),
}

type TelemetryInitializer = dyn Fn(&mut TelemetryItem) + Send + Sync;
type EventSuppressor = dyn Fn(&Event, &str) -> bool + Send + Sync;
type AppIdSupplier = dyn Fn() -> Option<String> + Send + Sync;

/// Translates finished spans into Azure Monitor telemetry items.
///
/// The mapper holds no per-span state; a single instance may be shared
/// across threads and called concurrently.
pub struct SpanMapper {
    capture_http_server_4xx_as_error: bool,
    telemetry_initializer: Box<TelemetryInitializer>,
    event_suppressor: Box<EventSuppressor>,
    app_id_supplier: Box<AppIdSupplier>,
}

impl fmt::Debug for SpanMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanMapper")
            .field(
                "capture_http_server_4xx_as_error",
                &self.capture_http_server_4xx_as_error,
            )
            .finish_non_exhaustive()
    }
}

impl SpanMapper {
    /// Creates a mapper with no-op collaborators.
    ///
    /// `capture_http_server_4xx_as_error` controls whether a status-UNSET
    /// span with a 4xx status code counts as failed.
    pub fn new(capture_http_server_4xx_as_error: bool) -> Self {
        SpanMapper {
            capture_http_server_4xx_as_error,
            telemetry_initializer: Box::new(|_| {}),
            event_suppressor: Box::new(|_, _| false),
            app_id_supplier: Box::new(|| None),
        }
    }

    /// Callback run on every fresh item before any field is set, used to
    /// inject environment defaults such as the cloud role.
    pub fn with_telemetry_initializer(
        mut self,
        initializer: impl Fn(&mut TelemetryItem) + Send + Sync + 'static,
    ) -> Self {
        self.telemetry_initializer = Box::new(initializer);
        self
    }

    /// Predicate over an event and the owning span's instrumentation-scope
    /// name; a `true` result drops the event.
    pub fn with_event_suppressor(
        mut self,
        suppressor: impl Fn(&Event, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.event_suppressor = Box::new(suppressor);
        self
    }

    /// Supplies this component's own app id, used to recognize
    /// cross-component calls.
    pub fn with_app_id_supplier(
        mut self,
        supplier: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.app_id_supplier = Box::new(supplier);
        self
    }

    /// Maps a span and its events, handing every produced item to `sink`.
    ///
    /// The span's item is emitted first; Message/Exception items derived
    /// from its events follow, linked through the operation name resolved
    /// for the span.
    pub fn map(
        &self,
        span: &SpanRecord,
        mut sink: impl FnMut(TelemetryItem),
    ) -> Result<(), Error> {
        let sampling_percentage =
            common::sampling_percentage(span.span_context.trace_state());
        let item = self.map_span_with_sampling(span, sampling_percentage)?;
        let operation_name = item.tags.get(&ContextTagKey::OperationName).cloned();
        sink(item);
        events::export_events(
            self,
            span,
            operation_name.as_deref(),
            sampling_percentage,
            &mut sink,
        );
        Ok(())
    }

    /// Maps only the span itself, without its events.
    pub fn map_span(&self, span: &SpanRecord) -> Result<TelemetryItem, Error> {
        let sampling_percentage =
            common::sampling_percentage(span.span_context.trace_state());
        self.map_span_with_sampling(span, sampling_percentage)
    }

    fn map_span_with_sampling(
        &self,
        span: &SpanRecord,
        sampling_percentage: f32,
    ) -> Result<TelemetryItem, Error> {
        let attrs = Attrs::new(&span.attributes);
        let item = match span.span_kind {
            SpanKind::Internal => {
                if span
                    .instrumentation_scope
                    .name()
                    .starts_with(SCHEDULING_SCOPE_PREFIX)
                    && !span.parent_is_valid()
                {
                    build_request(self, span, &attrs, sampling_percentage)
                } else {
                    build_remote_dependency(self, span, &attrs, true, sampling_percentage)
                }
            }
            SpanKind::Client | SpanKind::Producer => {
                build_remote_dependency(self, span, &attrs, false, sampling_percentage)
            }
            SpanKind::Consumer
                if attrs.string(semconv::MESSAGING_OPERATION) == Some("receive") =>
            {
                // a receive is an outbound call the consumer makes, not an
                // inbound request
                build_remote_dependency(self, span, &attrs, false, sampling_percentage)
            }
            SpanKind::Server | SpanKind::Consumer => {
                build_request(self, span, &attrs, sampling_percentage)
            }
        };
        Ok(item)
    }
}

fn build_remote_dependency(
    mapper: &SpanMapper,
    span: &SpanRecord,
    attrs: &Attrs<'_>,
    in_proc: bool,
    sampling_percentage: f32,
) -> TelemetryItem {
    let mut item = TelemetryItem::new(Telemetry::RemoteDependency(
        RemoteDependencyData::default(),
    ));
    (mapper.telemetry_initializer)(&mut item);

    common::set_operation_tags(&mut item, span, attrs);
    common::set_time(&mut item, span.start_time);
    common::set_sample_rate(&mut item, sampling_percentage);
    common::set_extra_attributes(&mut item, &span.attributes);
    common::add_links(&mut item, &span.links);

    let mut dependency = RemoteDependencyData {
        id: span.span_context.span_id().to_string(),
        name: semantics::dependency_name(span.name.as_ref(), attrs),
        duration: formats::format_duration_nanos(formats::elapsed_nanos(
            span.start_time,
            span.end_time,
        )),
        success: span_success(mapper, span, attrs),
        ..RemoteDependencyData::default()
    };

    if in_proc {
        dependency.dependency_type = Some("InProc".to_string());
    } else {
        let own_app_id = (mapper.app_id_supplier)();
        semantics::apply_semantic_conventions(
            &mut dependency,
            span.span_kind.clone(),
            attrs,
            own_app_id.as_deref(),
        );
    }

    item.data = Telemetry::RemoteDependency(dependency);
    item
}

fn build_request(
    mapper: &SpanMapper,
    span: &SpanRecord,
    attrs: &Attrs<'_>,
    sampling_percentage: f32,
) -> TelemetryItem {
    let mut item = TelemetryItem::new(Telemetry::Request(RequestData::default()));
    (mapper.telemetry_initializer)(&mut item);

    common::set_time(&mut item, span.start_time);
    common::set_sample_rate(&mut item, sampling_percentage);
    common::set_extra_attributes(&mut item, &span.attributes);
    common::add_links(&mut item, &span.links);

    let operation_name = request_operation_name(span, attrs);
    common::set_operation_name(&mut item, &operation_name);
    common::set_operation_id(&mut item, span.span_context.trace_id());

    // the legacy parent id takes precedence: it is the real parent, it just
    // does not fit the span id format
    if let Some(legacy_parent_id) = attrs.string(semconv::AI_LEGACY_PARENT_ID) {
        item.tags.insert(
            ContextTagKey::OperationParentId,
            legacy_parent_id.to_string(),
        );
    } else if span.parent_is_valid() {
        item.tags.insert(
            ContextTagKey::OperationParentId,
            span.parent_span_id.to_string(),
        );
    }
    if let Some(legacy_root_id) = attrs.string(semconv::AI_LEGACY_ROOT_ID) {
        item.tags
            .insert(ContextTagKey::LegacyRootId, legacy_root_id.to_string());
    }

    if let Some(location_ip) = attrs
        .string(semconv::HTTP_CLIENT_IP)
        .or_else(|| attrs.string(semconv::NET_PEER_IP))
    {
        item.tags
            .insert(ContextTagKey::LocationIp, location_ip.to_string());
    }

    // legacy web interop bridge tags
    if let Some(session_id) = attrs.string(semconv::AI_SESSION_ID) {
        item.tags
            .insert(ContextTagKey::SessionId, session_id.to_string());
    }
    if let Some(device_os) = attrs.string(semconv::AI_DEVICE_OS) {
        item.tags
            .insert(ContextTagKey::DeviceOs, device_os.to_string());
    }
    if let Some(device_os_version) = attrs.string(semconv::AI_DEVICE_OS_VERSION) {
        item.tags.insert(
            ContextTagKey::DeviceOsVersion,
            device_os_version.to_string(),
        );
    }

    if let Some(enqueued_seconds) = attrs.int(semconv::AZURE_SDK_ENQUEUED_TIME) {
        let start_millis = formats::epoch_millis(span.start_time);
        let waited_millis = (start_millis - enqueued_seconds * 1_000).max(0);
        item.measurements
            .insert(TIME_SINCE_ENQUEUED.to_string(), waited_millis as f64);
    }
    if let Some(queue_time_millis) = attrs.int(semconv::KAFKA_RECORD_QUEUE_TIME_MS) {
        item.measurements
            .insert(TIME_SINCE_ENQUEUED.to_string(), queue_time_millis as f64);
    }

    let response_code = attrs
        .int(semconv::HTTP_STATUS_CODE)
        .or_else(|| attrs.int(semconv::RPC_GRPC_STATUS_CODE))
        .map(|code| code.to_string())
        .unwrap_or_else(|| "0".to_string());

    item.data = Telemetry::Request(RequestData {
        id: span.span_context.span_id().to_string(),
        name: operation_name,
        duration: formats::format_duration_nanos(formats::elapsed_nanos(
            span.start_time,
            span.end_time,
        )),
        success: span_success(mapper, span, attrs),
        response_code,
        url: request_url(attrs),
        source: request_source(mapper, span, attrs),
    });
    item
}

/// Success per status: ERROR is failure, OK is an explicit user override,
/// and UNSET falls back to the 4xx-as-error configuration.
fn span_success(mapper: &SpanMapper, span: &SpanRecord, attrs: &Attrs<'_>) -> bool {
    use opentelemetry::trace::Status;
    match &span.status {
        Status::Error { .. } => false,
        Status::Ok => true,
        _ => {
            if mapper.capture_http_server_4xx_as_error {
                attrs
                    .int(semconv::HTTP_STATUS_CODE)
                    .map_or(true, |code| code < 400)
            } else {
                true
            }
        }
    }
}

fn request_operation_name(span: &SpanRecord, attrs: &Attrs<'_>) -> String {
    if let Some(operation_name) = attrs.string(semconv::AI_OPERATION_NAME) {
        return operation_name.to_string();
    }
    let span_name = span.name.as_ref();
    match attrs.string(semconv::HTTP_METHOD) {
        Some(method) if !method.is_empty() && span_name.starts_with('/') => {
            format!("{method} {span_name}")
        }
        _ => span_name.to_string(),
    }
}

/// The request URL, reconstructed from its parts when `http.url` is absent.
fn request_url(attrs: &Attrs<'_>) -> Option<String> {
    if let Some(url) = attrs.string(semconv::HTTP_URL) {
        return Some(url.to_string());
    }
    let scheme = attrs.string(semconv::HTTP_SCHEME)?;
    let host = attrs.string(semconv::HTTP_HOST)?;
    let target = attrs.string(semconv::HTTP_TARGET)?;
    Some(format!("{scheme}://{host}{target}"))
}

fn request_source(
    mapper: &SpanMapper,
    span: &SpanRecord,
    attrs: &Attrs<'_>,
) -> Option<String> {
    // legacy web interop bridge override
    if let Some(source) = attrs.string(semconv::AI_SPAN_SOURCE) {
        return Some(source.to_string());
    }
    if let Some(source) = span
        .span_context
        .trace_state()
        .get(semconv::TRACE_STATE_APP_ID)
    {
        if (mapper.app_id_supplier)().as_deref() != Some(source) {
            return Some(source.to_string());
        }
    }
    semantics::messaging_target_source(attrs)
}
