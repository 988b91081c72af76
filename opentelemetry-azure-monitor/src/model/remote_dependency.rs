use serde::Serialize;

/// An outgoing call: HTTP, database, messaging, RPC, or an in-process
/// sub-operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDependencyData {
    /// Dependency identifier (the span id).
    pub id: String,
    /// Dependency display name.
    pub name: String,
    /// Elapsed time in the backend duration format.
    pub duration: String,
    /// Whether the call completed successfully.
    pub success: bool,
    /// Dependency type, e.g. `Http`, `SQL`, or `InProc`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    /// Target site of the call, e.g. a host or a `host | database` pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Command or detail of the call, e.g. a URL or an SQL statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Result code of the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<String>,
}
