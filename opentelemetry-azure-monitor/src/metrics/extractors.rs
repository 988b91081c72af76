//! Seeds the pre-aggregated duration metric items.

use opentelemetry::KeyValue;

use crate::mapper::common::attribute_value_string;
use crate::model::{MetricDataPoint, MetricsData, Telemetry, TelemetryItem};

/// Reserved property naming the standard metric an item belongs to.
pub const METRIC_ID_PROPERTY: &str = "_MS.MetricId";
/// Metric id of the request duration metric.
pub const REQUESTS_DURATION: &str = "requests/duration";
/// Property carrying the request result code dimension.
pub const REQUEST_RESULT_CODE: &str = "request/resultCode";
/// Property carrying the request success dimension.
pub const REQUEST_SUCCESS: &str = "request/success";

const IS_AUTOCOLLECTED_PROPERTY: &str = "_MS.IsAutocollected";
const OPERATION_SYNTHETIC_PROPERTY: &str = "operation/synthetic";
const TRUE: &str = "True";
const FALSE: &str = "False";

/// Builds the single-sample seed of the pre-aggregated request duration
/// metric.
///
/// `view_attributes` is the output of one of the [`crate::metrics`] views;
/// the allow-listing there is what keeps this metric's cardinality bounded.
/// The timestamp is left empty for the aggregation pipeline to stamp.
pub fn build_request_duration_metric(
    duration_millis: f64,
    response_code: Option<i64>,
    success: bool,
    is_synthetic: Option<bool>,
    view_attributes: &[KeyValue],
) -> TelemetryItem {
    let mut item = TelemetryItem::new(Telemetry::Metric(MetricsData {
        metrics: vec![MetricDataPoint {
            name: REQUESTS_DURATION.to_string(),
            value: duration_millis,
            count: Some(1),
            min: Some(duration_millis),
            max: Some(duration_millis),
            std_dev: None,
        }],
    }));

    item.properties
        .insert(IS_AUTOCOLLECTED_PROPERTY.to_string(), TRUE.to_string());
    if let Some(is_synthetic) = is_synthetic {
        item.properties.insert(
            OPERATION_SYNTHETIC_PROPERTY.to_string(),
            if is_synthetic { TRUE } else { FALSE }.to_string(),
        );
    }
    item.properties
        .insert(METRIC_ID_PROPERTY.to_string(), REQUESTS_DURATION.to_string());
    if let Some(response_code) = response_code {
        item.properties
            .insert(REQUEST_RESULT_CODE.to_string(), response_code.to_string());
    }
    item.properties.insert(
        REQUEST_SUCCESS.to_string(),
        if success { TRUE } else { FALSE }.to_string(),
    );

    for attribute in view_attributes {
        if let Some(value) = attribute_value_string(&attribute.value) {
            item.properties.insert(attribute.key.to_string(), value);
        }
    }

    item
}
