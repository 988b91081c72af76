use serde::Serialize;

/// A trace log line derived from a span event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    /// The message text (the event name).
    pub message: String,
}
