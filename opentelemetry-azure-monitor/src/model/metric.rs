use serde::Serialize;

/// A pre-aggregated metric payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsData {
    /// The data points of the metric.
    pub metrics: Vec<MetricDataPoint>,
}

/// A single metric data point.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDataPoint {
    /// Metric name.
    pub name: String,
    /// Aggregated value.
    pub value: f64,
    /// Number of samples aggregated into the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    /// Smallest aggregated sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest aggregated sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Standard deviation of the aggregated samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}
