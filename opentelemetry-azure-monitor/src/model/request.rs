use serde::Serialize;

/// An incoming operation: an HTTP request, or an invocation triggered by a
/// message or a scheduler.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    /// Request identifier (the span id).
    pub id: String,
    /// Request display name.
    pub name: String,
    /// Elapsed time in the backend duration format.
    pub duration: String,
    /// Whether the request completed successfully.
    pub success: bool,
    /// Result code of the request.
    pub response_code: String,
    /// Request URL, when one can be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Source of the request: the calling component or message queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
