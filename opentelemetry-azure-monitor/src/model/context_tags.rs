//! The fixed context tag namespace.

use serde::Serialize;

/// Keys permitted in a telemetry item's `tags` map.
///
/// The backend only understands this closed set; using an enum as the map
/// key makes an out-of-contract tag unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContextTagKey {
    /// Trace id of the owning operation.
    #[serde(rename = "ai.operation.id")]
    OperationId,
    /// Span id of the operation parent.
    #[serde(rename = "ai.operation.parentId")]
    OperationParentId,
    /// Display name of the owning operation.
    #[serde(rename = "ai.operation.name")]
    OperationName,
    /// Authenticated user id.
    #[serde(rename = "ai.user.id")]
    UserId,
    /// User agent of the calling client.
    #[serde(rename = "ai.user.userAgent")]
    UserAgent,
    /// Cloud role name.
    #[serde(rename = "ai.cloud.role")]
    CloudRole,
    /// Cloud role instance.
    #[serde(rename = "ai.cloud.roleInstance")]
    CloudRoleInstance,
    /// Application version.
    #[serde(rename = "ai.application.ver")]
    ApplicationVersion,
    /// Client location IP.
    #[serde(rename = "ai.location.ip")]
    LocationIp,
    /// Session id.
    #[serde(rename = "ai.session.id")]
    SessionId,
    /// Device operating system.
    #[serde(rename = "ai.device.os")]
    DeviceOs,
    /// Device operating system version.
    #[serde(rename = "ai.device.osVersion")]
    DeviceOsVersion,
    /// Root id bridge for correlation with legacy SDKs.
    #[serde(rename = "ai_legacyRootID")]
    LegacyRootId,
}

impl ContextTagKey {
    /// The wire name of the tag key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTagKey::OperationId => "ai.operation.id",
            ContextTagKey::OperationParentId => "ai.operation.parentId",
            ContextTagKey::OperationName => "ai.operation.name",
            ContextTagKey::UserId => "ai.user.id",
            ContextTagKey::UserAgent => "ai.user.userAgent",
            ContextTagKey::CloudRole => "ai.cloud.role",
            ContextTagKey::CloudRoleInstance => "ai.cloud.roleInstance",
            ContextTagKey::ApplicationVersion => "ai.application.ver",
            ContextTagKey::LocationIp => "ai.location.ip",
            ContextTagKey::SessionId => "ai.session.id",
            ContextTagKey::DeviceOs => "ai.device.os",
            ContextTagKey::DeviceOsVersion => "ai.device.osVersion",
            ContextTagKey::LegacyRootId => "ai_legacyRootID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_wire_name() {
        let mut tags = std::collections::BTreeMap::new();
        tags.insert(ContextTagKey::OperationId, "abc".to_string());
        assert_eq!(
            serde_json::to_string(&tags).unwrap(),
            r#"{"ai.operation.id":"abc"}"#
        );
    }
}
