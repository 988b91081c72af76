//! Protocol-family resolution for outgoing calls.
//!
//! Derives `(type, target, data, result code)` for a dependency from span
//! attributes, trying the families in a fixed priority order:
//! HTTP, RPC, database, messaging, generic peer, and finally in-process.

use once_cell::sync::Lazy;
use opentelemetry::trace::SpanKind;
use std::collections::HashSet;
use url::Url;

use crate::model::RemoteDependencyData;
use crate::semconv;
use crate::span::Attrs;

/// Sentinel default port that never matches, so the port is always kept.
const PORT_ALWAYS: i64 = i64::MAX;

static SQL_DB_SYSTEMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        semconv::db_systems::DB2,
        semconv::db_systems::DERBY,
        semconv::db_systems::MARIADB,
        semconv::db_systems::MSSQL,
        semconv::db_systems::MYSQL,
        semconv::db_systems::ORACLE,
        semconv::db_systems::POSTGRESQL,
        semconv::db_systems::SQLITE,
        semconv::db_systems::OTHER_SQL,
        semconv::db_systems::HSQLDB,
        semconv::db_systems::H2,
    ])
});

/// Span names instrumentation emits when it has nothing better than the
/// method.
const DEFAULT_HTTP_SPAN_NAMES: [&str; 9] = [
    "HTTP OPTIONS",
    "HTTP GET",
    "HTTP HEAD",
    "HTTP POST",
    "HTTP PUT",
    "HTTP DELETE",
    "HTTP TRACE",
    "HTTP CONNECT",
    "HTTP PATCH",
];

pub(crate) fn apply_semantic_conventions(
    dependency: &mut RemoteDependencyData,
    span_kind: SpanKind,
    attrs: &Attrs<'_>,
    own_app_id: Option<&str>,
) {
    if attrs.string(semconv::HTTP_METHOD).is_some() {
        apply_http_client_span(dependency, attrs, own_app_id);
        return;
    }
    if let Some(rpc_system) = attrs.string(semconv::RPC_SYSTEM) {
        apply_rpc_client_span(dependency, rpc_system, attrs);
        return;
    }
    if let Some(db_system) = attrs.string(semconv::DB_SYSTEM) {
        apply_database_client_span(dependency, db_system, attrs);
        return;
    }
    if let Some(messaging_system) = messaging_system(attrs) {
        apply_messaging_client_span(dependency, span_kind, &messaging_system, attrs);
        return;
    }

    // Always include the port here: with no recognized family there is no
    // scheme to tell us what the default would have been.
    if let Some(target) = target_from_peer_attributes(attrs, PORT_ALWAYS) {
        dependency.target = Some(target);
        return;
    }

    // With no target at all, the application map would key a node off the
    // bare telemetry name, lumping unrelated calls into one node. InProc
    // keeps these out of the map.
    dependency.dependency_type = Some("InProc".to_string());
}

/// The backend prefers a `METHOD /path` name over the instrumentation's
/// low-cardinality default for HTTP dependencies.
pub(crate) fn dependency_name(name: &str, attrs: &Attrs<'_>) -> String {
    let Some(method) = attrs.string(semconv::HTTP_METHOD) else {
        return name.to_string();
    };
    if !DEFAULT_HTTP_SPAN_NAMES.contains(&name) {
        return name.to_string();
    }
    let Some(url) = attrs.string(semconv::HTTP_URL) else {
        return name.to_string();
    };
    let Some(path) = path_from_url(url) else {
        return name.to_string();
    };
    if path.is_empty() {
        format!("{method} /")
    } else {
        format!("{method} {path}")
    }
}

fn apply_http_client_span(
    dependency: &mut RemoteDependencyData,
    attrs: &Attrs<'_>,
    own_app_id: Option<&str>,
) {
    let target = target_for_http_client_span(attrs);

    match target_app_id(attrs) {
        Some(target_app_id) if Some(target_app_id) != own_app_id => {
            // A plain "Http" type would make the backend strip the app id
            // from the target of cross-component calls.
            dependency.dependency_type = Some("Http (tracked component)".to_string());
            dependency.target = Some(format!("{target} | {target_app_id}"));
        }
        _ => {
            dependency.dependency_type = Some("Http".to_string());
            dependency.target = Some(target);
        }
    }

    dependency.result_code = attrs
        .int(semconv::HTTP_STATUS_CODE)
        .map(|code| code.to_string());
    dependency.data = attrs.string(semconv::HTTP_URL).map(str::to_string);
}

/// App id of the remote component, from the captured response context
/// header. The header value has the form `appId=<value>`.
fn target_app_id<'a>(attrs: &Attrs<'a>) -> Option<&'a str> {
    let request_context = attrs.first_string_of_array(semconv::AI_REQUEST_CONTEXT)?;
    request_context
        .split_once('=')
        .map(|(_, app_id)| app_id)
}

fn target_for_http_client_span(attrs: &Attrs<'_>) -> String {
    // At least one of http.url, http.host + http.scheme, or the net.peer
    // attributes is required by the conventions; try them most-specific
    // first.
    if let Some(peer_service) = attrs.string(semconv::PEER_SERVICE) {
        return peer_service.to_string();
    }

    // http.host includes a non-default port already; strip the default one.
    if let Some(host) = attrs.string(semconv::HTTP_HOST) {
        let scheme = attrs.string(semconv::HTTP_SCHEME);
        let stripped = match scheme {
            Some("http") => host.strip_suffix(":80"),
            Some("https") => host.strip_suffix(":443"),
            _ => None,
        };
        return stripped.unwrap_or(host).to_string();
    }

    if let Some(url) = attrs.string(semconv::HTTP_URL) {
        if let Some(target) = target_from_url(url) {
            return target;
        }
    }

    let default_port = match attrs.string(semconv::HTTP_SCHEME) {
        Some("http") => 80,
        Some("https") => 443,
        _ => 0,
    };
    if let Some(target) = target_from_net_attributes(attrs, default_port) {
        return target;
    }

    // failsafe, the conventions guarantee one of the above
    "Http".to_string()
}

fn apply_rpc_client_span(
    dependency: &mut RemoteDependencyData,
    rpc_system: &str,
    attrs: &Attrs<'_>,
) {
    dependency.dependency_type = Some(rpc_system.to_string());
    // not appending rpc.service, that granularity belongs in the name
    let target = target_from_peer_attributes(attrs, 0).unwrap_or_else(|| rpc_system.to_string());
    dependency.target = Some(target);
}

fn apply_database_client_span(
    dependency: &mut RemoteDependencyData,
    db_system: &str,
    attrs: &Attrs<'_>,
) {
    let statement = attrs
        .string(semconv::DB_STATEMENT)
        .or_else(|| attrs.string(semconv::DB_OPERATION));
    let dependency_type = if SQL_DB_SYSTEMS.contains(db_system) {
        match db_system {
            // these two have their own icon in the portal
            semconv::db_systems::MYSQL => "mysql",
            semconv::db_systems::POSTGRESQL => "postgresql",
            _ => "SQL",
        }
    } else {
        db_system
    };
    dependency.dependency_type = Some(dependency_type.to_string());
    dependency.data = statement.map(str::to_string);

    let target = null_aware_concat(
        target_from_peer_attributes(attrs, default_port_for_db_system(db_system)),
        attrs.string(semconv::DB_NAME),
        " | ",
    );
    dependency.target = Some(target.unwrap_or_else(|| db_system.to_string()));
}

fn apply_messaging_client_span(
    dependency: &mut RemoteDependencyData,
    span_kind: SpanKind,
    messaging_system: &str,
    attrs: &Attrs<'_>,
) {
    if span_kind == SpanKind::Producer {
        dependency.dependency_type = Some(format!("Queue Message | {messaging_system}"));
    } else {
        // e.g. CONSUMER kind (without remote parent) and CLIENT kind
        dependency.dependency_type = Some(messaging_system.to_string());
    }
    dependency.target = messaging_target_source(attrs);
}

/// The messaging system, preferring the Azure SDK namespace attribute until
/// those SDKs move to the generic conventions.
pub(crate) fn messaging_system(attrs: &Attrs<'_>) -> Option<String> {
    let azure_namespace = attrs.string(semconv::AZ_NAMESPACE);
    if is_azure_sdk_messaging(azure_namespace) {
        return azure_namespace.map(str::to_string);
    }
    attrs.string(semconv::MESSAGING_SYSTEM).map(str::to_string)
}

/// Target of a messaging dependency, doubling as the source of a request
/// triggered by a message.
pub(crate) fn messaging_target_source(attrs: &Attrs<'_>) -> Option<String> {
    if is_azure_sdk_messaging(attrs.string(semconv::AZ_NAMESPACE)) {
        return null_aware_concat(
            attrs
                .string(semconv::AZURE_SDK_PEER_ADDRESS)
                .map(str::to_string),
            attrs.string(semconv::AZURE_SDK_MESSAGE_BUS_DESTINATION),
            "/",
        );
    }
    let messaging_system = attrs.string(semconv::MESSAGING_SYSTEM)?;
    let source = null_aware_concat(
        target_from_peer_attributes(attrs, 0),
        attrs.string(semconv::MESSAGING_DESTINATION),
        "/",
    );
    Some(source.unwrap_or_else(|| messaging_system.to_string()))
}

fn is_azure_sdk_messaging(messaging_system: Option<&str>) -> bool {
    messaging_system.is_some_and(|system| {
        semconv::AZURE_SDK_MESSAGING_NAMESPACES.contains(&system)
    })
}

pub(crate) fn target_from_peer_attributes(
    attrs: &Attrs<'_>,
    default_port: i64,
) -> Option<String> {
    // peer.service is authoritative and never gets a port appended
    if let Some(peer_service) = attrs.string(semconv::PEER_SERVICE) {
        return Some(peer_service.to_string());
    }
    target_from_net_attributes(attrs, default_port)
}

fn target_from_net_attributes(attrs: &Attrs<'_>, default_port: i64) -> Option<String> {
    let host = attrs
        .string(semconv::NET_PEER_NAME)
        .or_else(|| attrs.string(semconv::NET_PEER_IP))?;
    match attrs.int(semconv::NET_PEER_PORT) {
        Some(port) if port != default_port => Some(format!("{host}:{port}")),
        _ => Some(host.to_string()),
    }
}

fn default_port_for_db_system(db_system: &str) -> i64 {
    match db_system {
        semconv::db_systems::MONGODB => 27017,
        semconv::db_systems::CASSANDRA => 9042,
        semconv::db_systems::REDIS => 6379,
        semconv::db_systems::MARIADB | semconv::db_systems::MYSQL => 3306,
        semconv::db_systems::MSSQL => 1433,
        semconv::db_systems::DB2 => 50000,
        semconv::db_systems::ORACLE => 1521,
        semconv::db_systems::H2 => 8082,
        semconv::db_systems::DERBY => 1527,
        semconv::db_systems::POSTGRESQL => 5432,
        _ => 0,
    }
}

/// `host`, or `host:port` when the URL carries a non-default port.
fn target_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// URL path without the query, `None` when the URL does not parse.
fn path_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    Some(parsed.path().to_string())
}

fn null_aware_concat(
    left: Option<String>,
    right: Option<&str>,
    separator: &str,
) -> Option<String> {
    match (left, right) {
        (Some(left), Some(right)) => Some(format!("{left}{separator}{right}")),
        (Some(left), None) => Some(left),
        (None, Some(right)) => Some(right.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::KeyValue;

    fn attrs_from(attributes: &[KeyValue]) -> Attrs<'_> {
        Attrs::new(attributes)
    }

    #[test]
    fn http_target_prefers_peer_service_without_port() {
        let attributes = vec![
            KeyValue::new("peer.service", "billing"),
            KeyValue::new("net.peer.name", "ignored"),
            KeyValue::new("net.peer.port", 8443),
        ];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "billing"
        );
    }

    #[test]
    fn http_target_strips_default_port_from_host() {
        let attributes = vec![
            KeyValue::new("http.host", "example.com:80"),
            KeyValue::new("http.scheme", "http"),
        ];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "example.com"
        );

        let attributes = vec![
            KeyValue::new("http.host", "example.com:8080"),
            KeyValue::new("http.scheme", "http"),
        ];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "example.com:8080"
        );
    }

    #[test]
    fn http_target_from_url_omits_default_port() {
        let attributes = vec![KeyValue::new("http.url", "http://x/foo/bar")];
        assert_eq!(target_for_http_client_span(&attrs_from(&attributes)), "x");

        let attributes = vec![KeyValue::new("http.url", "https://x:9443/foo")];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "x:9443"
        );
    }

    #[test]
    fn http_target_from_net_attributes_respects_scheme_default() {
        let attributes = vec![
            KeyValue::new("http.scheme", "https"),
            KeyValue::new("net.peer.name", "api.internal"),
            KeyValue::new("net.peer.port", 443),
        ];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "api.internal"
        );

        let attributes = vec![
            KeyValue::new("http.scheme", "https"),
            KeyValue::new("net.peer.ip", "10.0.0.7"),
            KeyValue::new("net.peer.port", 8443),
        ];
        assert_eq!(
            target_for_http_client_span(&attrs_from(&attributes)),
            "10.0.0.7:8443"
        );
    }

    #[test]
    fn db_target_concatenates_database_name() {
        let attributes = vec![
            KeyValue::new("db.system", "mysql"),
            KeyValue::new("net.peer.name", "db1"),
            KeyValue::new("db.name", "orders"),
        ];
        let mut dependency = RemoteDependencyData::default();
        apply_database_client_span(&mut dependency, "mysql", &attrs_from(&attributes));

        assert_eq!(dependency.dependency_type.as_deref(), Some("mysql"));
        assert_eq!(dependency.target.as_deref(), Some("db1 | orders"));
    }

    #[test]
    fn db_default_port_is_stripped() {
        let attributes = vec![
            KeyValue::new("net.peer.name", "db1"),
            KeyValue::new("net.peer.port", 5432),
            KeyValue::new("db.statement", "SELECT 1"),
        ];
        let mut dependency = RemoteDependencyData::default();
        apply_database_client_span(&mut dependency, "postgresql", &attrs_from(&attributes));

        assert_eq!(dependency.dependency_type.as_deref(), Some("postgresql"));
        assert_eq!(dependency.target.as_deref(), Some("db1"));
        assert_eq!(dependency.data.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn sql_systems_collapse_to_sql_type() {
        let attributes = vec![KeyValue::new("db.operation", "SELECT")];
        let mut dependency = RemoteDependencyData::default();
        apply_database_client_span(&mut dependency, "mssql", &attrs_from(&attributes));

        assert_eq!(dependency.dependency_type.as_deref(), Some("SQL"));
        assert_eq!(dependency.target.as_deref(), Some("mssql"));
        assert_eq!(dependency.data.as_deref(), Some("SELECT"));
    }

    #[test]
    fn non_sql_system_passes_through() {
        let attributes = vec![KeyValue::new("net.peer.name", "cache"), KeyValue::new("net.peer.port", 6379)];
        let mut dependency = RemoteDependencyData::default();
        apply_database_client_span(&mut dependency, "redis", &attrs_from(&attributes));

        assert_eq!(dependency.dependency_type.as_deref(), Some("redis"));
        assert_eq!(dependency.target.as_deref(), Some("cache"));
    }

    #[test]
    fn rpc_target_falls_back_to_system() {
        let attributes = vec![KeyValue::new("rpc.system", "grpc")];
        let mut dependency = RemoteDependencyData::default();
        apply_rpc_client_span(&mut dependency, "grpc", &attrs_from(&attributes));

        assert_eq!(dependency.dependency_type.as_deref(), Some("grpc"));
        assert_eq!(dependency.target.as_deref(), Some("grpc"));
    }

    #[test]
    fn messaging_producer_type_is_prefixed() {
        let attributes = vec![
            KeyValue::new("messaging.system", "kafka"),
            KeyValue::new("messaging.destination", "orders"),
            KeyValue::new("net.peer.name", "broker"),
        ];
        let mut dependency = RemoteDependencyData::default();
        apply_messaging_client_span(
            &mut dependency,
            SpanKind::Producer,
            "kafka",
            &attrs_from(&attributes),
        );

        assert_eq!(
            dependency.dependency_type.as_deref(),
            Some("Queue Message | kafka")
        );
        assert_eq!(dependency.target.as_deref(), Some("broker/orders"));
    }

    #[test]
    fn azure_messaging_namespace_wins_over_generic_system() {
        let attributes = vec![
            KeyValue::new("az.namespace", "Microsoft.EventHub"),
            KeyValue::new("peer.address", "example.servicebus.windows.net"),
            KeyValue::new("message_bus.destination", "events"),
        ];
        let attrs = attrs_from(&attributes);

        assert_eq!(messaging_system(&attrs).as_deref(), Some("Microsoft.EventHub"));
        assert_eq!(
            messaging_target_source(&attrs).as_deref(),
            Some("example.servicebus.windows.net/events")
        );
    }

    #[test]
    fn generic_peer_fallback_always_keeps_port() {
        let attributes = vec![
            KeyValue::new("net.peer.name", "downstream"),
            KeyValue::new("net.peer.port", 80),
        ];
        let mut dependency = RemoteDependencyData::default();
        apply_semantic_conventions(
            &mut dependency,
            SpanKind::Client,
            &attrs_from(&attributes),
            None,
        );

        assert_eq!(dependency.target.as_deref(), Some("downstream:80"));
        assert_eq!(dependency.dependency_type, None);
    }

    #[test]
    fn no_recognized_family_maps_to_in_proc() {
        let attributes = vec![KeyValue::new("custom.attribute", "value")];
        let mut dependency = RemoteDependencyData::default();
        apply_semantic_conventions(
            &mut dependency,
            SpanKind::Client,
            &attrs_from(&attributes),
            None,
        );

        assert_eq!(dependency.dependency_type.as_deref(), Some("InProc"));
        assert_eq!(dependency.target, None);
    }

    #[test]
    fn default_http_names_are_replaced_with_method_and_path() {
        let attributes = vec![
            KeyValue::new("http.method", "GET"),
            KeyValue::new("http.url", "http://x/foo/bar"),
        ];
        assert_eq!(
            dependency_name("HTTP GET", &attrs_from(&attributes)),
            "GET /foo/bar"
        );
        assert_eq!(
            dependency_name("custom name", &attrs_from(&attributes)),
            "custom name"
        );
    }

    #[test]
    fn cross_component_target_carries_app_id() {
        use opentelemetry::{Array, StringValue, Value};
        let header: Vec<StringValue> = vec!["appId=other-component".into()];
        let attributes = vec![
            KeyValue::new("http.method", "GET"),
            KeyValue::new("http.url", "http://x/foo"),
            KeyValue::new(
                "http.response.header.request_context",
                Value::Array(Array::String(header)),
            ),
        ];
        let mut dependency = RemoteDependencyData::default();
        apply_http_client_span(&mut dependency, &attrs_from(&attributes), Some("own"));

        assert_eq!(
            dependency.dependency_type.as_deref(),
            Some("Http (tracked component)")
        );
        assert_eq!(dependency.target.as_deref(), Some("x | other-component"));

        let mut dependency = RemoteDependencyData::default();
        apply_http_client_span(
            &mut dependency,
            &attrs_from(&attributes),
            Some("other-component"),
        );
        assert_eq!(dependency.dependency_type.as_deref(), Some("Http"));
        assert_eq!(dependency.target.as_deref(), Some("x"));
    }
}
