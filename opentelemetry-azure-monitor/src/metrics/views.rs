//! Allow-list views over call attribute snapshots.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use opentelemetry::{KeyValue, Value};

use crate::semconv;

static ALWAYS_INCLUDE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from([semconv::RPC_SYSTEM]));

static CLIENT_VIEW: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut view = ALWAYS_INCLUDE.clone();
    view.insert(semconv::NET_PEER_NAME);
    view.insert(semconv::NET_PEER_PORT);
    view
});

static SERVER_VIEW: Lazy<HashSet<&'static str>> = Lazy::new(|| ALWAYS_INCLUDE.clone());

static SERVER_FALLBACK_VIEW: Lazy<HashSet<&'static str>> = Lazy::new(|| ALWAYS_INCLUDE.clone());

/// Filters the snapshots of an outgoing call down to the client view.
pub fn apply_client_view(
    start_attributes: &[KeyValue],
    end_attributes: &[KeyValue],
) -> Vec<KeyValue> {
    apply_view(&CLIENT_VIEW, start_attributes, end_attributes)
}

/// Filters the snapshots of an incoming call down to the server view.
///
/// Falls back to the reduced view when neither snapshot names the local
/// host.
pub fn apply_server_view(
    start_attributes: &[KeyValue],
    end_attributes: &[KeyValue],
) -> Vec<KeyValue> {
    let view = if contains_attribute(semconv::NET_HOST_NAME, start_attributes, end_attributes) {
        &SERVER_VIEW
    } else {
        &SERVER_FALLBACK_VIEW
    };
    apply_view(view, start_attributes, end_attributes)
}

fn contains_attribute(key: &str, start_attributes: &[KeyValue], end_attributes: &[KeyValue]) -> bool {
    start_attributes
        .iter()
        .chain(end_attributes)
        .any(|attribute| attribute.key.as_str() == key)
}

/// Walks the start snapshot, then the end snapshot, keeping allow-listed
/// keys; a key present in both resolves to the end value.
fn apply_view(
    view: &HashSet<&'static str>,
    start_attributes: &[KeyValue],
    end_attributes: &[KeyValue],
) -> Vec<KeyValue> {
    let mut filtered: BTreeMap<&str, &Value> = BTreeMap::new();
    for attribute in start_attributes.iter().chain(end_attributes) {
        if view.contains(attribute.key.as_str()) {
            filtered.insert(attribute.key.as_str(), &attribute.value);
        }
    }
    filtered
        .into_iter()
        .map(|(key, value)| KeyValue::new(key.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_view_keeps_only_allow_listed_keys() {
        let start = vec![
            KeyValue::new("rpc.system", "grpc"),
            KeyValue::new("rpc.method", "GetOrder"),
            KeyValue::new("net.peer.name", "orders.internal"),
        ];
        let end = vec![KeyValue::new("net.peer.port", 8443)];

        let filtered = apply_client_view(&start, &end);
        let keys: Vec<&str> = filtered.iter().map(|kv| kv.key.as_str()).collect();

        assert_eq!(keys, ["net.peer.name", "net.peer.port", "rpc.system"]);
    }

    #[test]
    fn end_snapshot_wins_for_duplicate_keys() {
        let start = vec![KeyValue::new("rpc.system", "grpc")];
        let end = vec![KeyValue::new("rpc.system", "wcf")];

        let filtered = apply_client_view(&start, &end);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, Value::from("wcf"));
    }

    #[test]
    fn server_view_never_includes_peer_attributes() {
        let start = vec![
            KeyValue::new("rpc.system", "grpc"),
            KeyValue::new("net.peer.name", "caller"),
            KeyValue::new("net.host.name", "me"),
        ];
        let filtered = apply_server_view(&start, &[]);
        let keys: Vec<&str> = filtered.iter().map(|kv| kv.key.as_str()).collect();

        assert_eq!(keys, ["rpc.system"]);
    }

    #[test]
    fn server_fallback_applies_without_host_name() {
        let start = vec![KeyValue::new("rpc.system", "grpc")];
        let filtered = apply_server_view(&start, &[]);
        assert_eq!(filtered.len(), 1);
    }
}
