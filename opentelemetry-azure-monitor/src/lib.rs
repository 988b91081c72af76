//! # OpenTelemetry Azure Monitor Mappings
//!
//! Translates finished OpenTelemetry spans into the Azure Monitor
//! (Application Insights) telemetry schema. Spans become [`model::Telemetry::Request`]
//! or [`model::Telemetry::RemoteDependency`] items depending on span kind,
//! span events become [`model::Telemetry::Message`] or
//! [`model::Telemetry::Exception`] items, and the [`metrics`] module provides
//! the attribute views used to seed pre-aggregated duration metrics.
//!
//! This crate is the mapping core only: it consumes an already-finished
//! [`SpanRecord`] and hands every produced [`model::TelemetryItem`] to a
//! caller-supplied sink. Transmission, batching and retry are the host
//! pipeline's concern.
//!
//! ## Quickstart
//!
//! ```
//! use opentelemetry::trace::{SpanContext, SpanId, SpanKind, Status, TraceFlags, TraceId, TraceState};
//! use opentelemetry::{InstrumentationScope, KeyValue};
//! use opentelemetry_azure_monitor::{SpanMapper, SpanRecord};
//! use std::time::{Duration, SystemTime};
//!
//! let span = SpanRecord {
//!     span_context: SpanContext::new(
//!         TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
//!         SpanId::from_hex("00f067aa0ba902b7").unwrap(),
//!         TraceFlags::SAMPLED,
//!         false,
//!         TraceState::default(),
//!     ),
//!     parent_span_id: SpanId::INVALID,
//!     span_kind: SpanKind::Server,
//!     name: "GET /orders".into(),
//!     start_time: SystemTime::UNIX_EPOCH,
//!     end_time: SystemTime::UNIX_EPOCH + Duration::from_millis(7),
//!     attributes: vec![KeyValue::new("http.status_code", 200)],
//!     events: Vec::new(),
//!     links: Vec::new(),
//!     status: Status::Unset,
//!     instrumentation_scope: InstrumentationScope::builder("example").build(),
//! };
//!
//! let mapper = SpanMapper::new(false);
//! let mut items = Vec::new();
//! mapper.map(&span, |item| items.push(item)).unwrap();
//! assert_eq!(items.len(), 1);
//! ```
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]

pub mod mapper;
pub mod metrics;
pub mod model;
pub mod semconv;
mod span;

pub use mapper::{Error, SpanMapper};
pub use span::SpanRecord;
