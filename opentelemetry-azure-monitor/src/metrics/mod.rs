//! Cardinality-bounded attribute views and pre-aggregated metric seeding.
//!
//! The duration metrics the backend pre-aggregates must not carry free-form
//! attributes: each view copies only its allow-listed keys out of the span's
//! start and end attribute snapshots, and the extractor stamps the fixed
//! marker properties the aggregation pipeline keys on.

mod extractors;
mod views;

pub use extractors::{
    build_request_duration_metric, METRIC_ID_PROPERTY, REQUESTS_DURATION, REQUEST_RESULT_CODE,
    REQUEST_SUCCESS,
};
pub use views::{apply_client_view, apply_server_view};
