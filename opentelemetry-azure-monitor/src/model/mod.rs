//! The Azure Monitor telemetry schema.
//!
//! These types form the wire contract produced by the mapper. Every item
//! shares the same envelope — timestamp, sampling rate, tags, free-form
//! properties and measurements — and carries one of the schema's base data
//! payloads.

use std::collections::BTreeMap;

use serde::Serialize;

mod context_tags;
mod exception;
pub(crate) mod formats;
mod message;
mod metric;
mod remote_dependency;
mod request;

pub use context_tags::ContextTagKey;
pub use exception::{minimal_parse, ExceptionData, ExceptionDetails, StackFrame};
pub use message::MessageData;
pub use metric::{MetricDataPoint, MetricsData};
pub use remote_dependency::RemoteDependencyData;
pub use request::RequestData;

/// A single telemetry envelope handed to the sink.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryItem {
    /// Timestamp of the item in the backend time format.
    pub time: String,
    /// Effective sampling percentage; absent means 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f32>,
    /// Per-item ingestion routing override.
    #[serde(rename = "iKey", skip_serializing_if = "Option::is_none")]
    pub instrumentation_key: Option<String>,
    /// Context tags, restricted to the fixed [`ContextTagKey`] namespace.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<ContextTagKey, String>,
    /// Free-form string properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Named measurements attached to the item.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub measurements: BTreeMap<String, f64>,
    /// The variant payload.
    #[serde(flatten)]
    pub data: Telemetry,
}

impl TelemetryItem {
    /// Creates an empty envelope around the given payload.
    pub fn new(data: Telemetry) -> Self {
        TelemetryItem {
            time: String::new(),
            sample_rate: None,
            instrumentation_key: None,
            tags: BTreeMap::new(),
            properties: BTreeMap::new(),
            measurements: BTreeMap::new(),
            data,
        }
    }
}

/// The base data payload of a telemetry item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "baseType")]
pub enum Telemetry {
    /// An incoming operation.
    #[serde(rename = "RequestData")]
    Request(RequestData),
    /// An outgoing or in-process call.
    #[serde(rename = "RemoteDependencyData")]
    RemoteDependency(RemoteDependencyData),
    /// A trace log line derived from a span event.
    #[serde(rename = "MessageData")]
    Message(MessageData),
    /// An exception recorded on a span event.
    #[serde(rename = "ExceptionData")]
    Exception(ExceptionData),
    /// A pre-aggregated metric.
    #[serde(rename = "MetricData")]
    Metric(MetricsData),
}
