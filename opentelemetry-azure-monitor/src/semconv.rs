//! Attribute keys and well-known values consumed by the mappings.
//!
//! These exact names are the wire contract with the instrumentation layer.
//! They are pinned to the convention generation the Azure Monitor schema was
//! built against and therefore live here rather than coming from a generated
//! semantic-conventions crate.

/// HTTP request method.
pub const HTTP_METHOD: &str = "http.method";
/// Full HTTP request URL.
pub const HTTP_URL: &str = "http.url";
/// URI scheme identifying the used protocol.
pub const HTTP_SCHEME: &str = "http.scheme";
/// HTTP host header value, including a non-default port.
pub const HTTP_HOST: &str = "http.host";
/// Full request target as passed in the request line.
pub const HTTP_TARGET: &str = "http.target";
/// HTTP response status code.
pub const HTTP_STATUS_CODE: &str = "http.status_code";
/// IP address of the original client behind all proxies.
pub const HTTP_CLIENT_IP: &str = "http.client_ip";
/// Value of the HTTP User-Agent header.
pub const HTTP_USER_AGENT: &str = "http.user_agent";

/// Remote hostname.
pub const NET_PEER_NAME: &str = "net.peer.name";
/// Remote address of the peer.
pub const NET_PEER_IP: &str = "net.peer.ip";
/// Remote port number.
pub const NET_PEER_PORT: &str = "net.peer.port";
/// Local hostname or similar.
pub const NET_HOST_NAME: &str = "net.host.name";

/// The service name of the remote service.
pub const PEER_SERVICE: &str = "peer.service";

/// A string identifying the remoting system.
pub const RPC_SYSTEM: &str = "rpc.system";
/// Numeric status code of the gRPC request.
pub const RPC_GRPC_STATUS_CODE: &str = "rpc.grpc.status_code";

/// An identifier for the database management system.
pub const DB_SYSTEM: &str = "db.system";
/// The database statement being executed.
pub const DB_STATEMENT: &str = "db.statement";
/// The name of the operation being executed.
pub const DB_OPERATION: &str = "db.operation";
/// The name of the database being accessed.
pub const DB_NAME: &str = "db.name";

/// A string identifying the messaging system.
pub const MESSAGING_SYSTEM: &str = "messaging.system";
/// The message destination name.
pub const MESSAGING_DESTINATION: &str = "messaging.destination";
/// A string identifying the kind of message consumption.
pub const MESSAGING_OPERATION: &str = "messaging.operation";

/// Namespace attribute set by the Azure SDKs.
pub const AZ_NAMESPACE: &str = "az.namespace";
/// Peer address attribute set by the Azure messaging SDKs.
pub const AZURE_SDK_PEER_ADDRESS: &str = "peer.address";
/// Destination attribute set by the Azure messaging SDKs.
pub const AZURE_SDK_MESSAGE_BUS_DESTINATION: &str = "message_bus.destination";
/// Enqueued time (epoch seconds) stamped on Azure messaging spans.
pub const AZURE_SDK_ENQUEUED_TIME: &str = "x-opt-enqueued-time";

/// Time a Kafka record spent in the queue, in milliseconds.
pub const KAFKA_RECORD_QUEUE_TIME_MS: &str = "kafka.record.queue_time_ms";
/// Offset of a Kafka record.
pub const KAFKA_OFFSET: &str = "kafka.offset";

/// Username or client id extracted from the access token.
pub const ENDUSER_ID: &str = "enduser.id";

/// The type of the exception.
pub const EXCEPTION_TYPE: &str = "exception.type";
/// The exception message.
pub const EXCEPTION_MESSAGE: &str = "exception.message";
/// A stacktrace as a string.
pub const EXCEPTION_STACKTRACE: &str = "exception.stacktrace";

/// Prefix shared by all internal bridging attributes; never exported.
pub const INTERNAL_ATTRIBUTE_PREFIX: &str = "applicationinsights.internal.";
/// Operation name override propagated by the instrumentation layer.
pub const AI_OPERATION_NAME: &str = "applicationinsights.internal.operation_name";
/// Legacy parent id that does not fit the span id format.
pub const AI_LEGACY_PARENT_ID: &str = "applicationinsights.internal.legacy_parent_id";
/// Legacy root id carried for correlation with legacy SDKs.
pub const AI_LEGACY_ROOT_ID: &str = "applicationinsights.internal.legacy_root_id";
/// Request source override set by the legacy web interop bridge.
pub const AI_SPAN_SOURCE: &str = "applicationinsights.internal.source";
/// Session id set by the legacy web interop bridge.
pub const AI_SESSION_ID: &str = "applicationinsights.internal.session_id";
/// Device operating system set by the legacy web interop bridge.
pub const AI_DEVICE_OS: &str = "applicationinsights.internal.operating_system";
/// Device operating system version set by the legacy web interop bridge.
pub const AI_DEVICE_OS_VERSION: &str = "applicationinsights.internal.operating_system_version";

/// Per-span instrumentation key override.
pub const AI_PREVIEW_INSTRUMENTATION_KEY: &str = "ai.preview.instrumentation_key";
/// Per-span cloud role override.
pub const AI_PREVIEW_SERVICE_NAME: &str = "ai.preview.service_name";
/// Per-span cloud role instance override.
pub const AI_PREVIEW_SERVICE_INSTANCE_ID: &str = "ai.preview.service_instance_id";
/// Per-span application version override.
pub const AI_PREVIEW_SERVICE_VERSION: &str = "ai.preview.service_version";

/// Captured response header carrying the remote component's app id.
pub const AI_REQUEST_CONTEXT: &str = "http.response.header.request_context";

/// Prefix of captured request headers, always kept as properties.
pub const REQUEST_HEADER_PREFIX: &str = "http.request.header.";
/// Prefix of captured response headers, always kept as properties.
pub const RESPONSE_HEADER_PREFIX: &str = "http.response.header.";

/// Trace-state entry carrying the already-determined sampling percentage.
pub const TRACE_STATE_SAMPLING_PERCENTAGE: &str = "ai-internal-sp";
/// Trace-state entry carrying the calling component's app id.
pub const TRACE_STATE_APP_ID: &str = "az";

/// Azure namespace values recognized as Azure SDK messaging spans.
pub const AZURE_SDK_MESSAGING_NAMESPACES: [&str; 2] = ["Microsoft.EventHub", "Microsoft.ServiceBus"];

/// `db.system` values grouped under the SQL dependency type.
pub mod db_systems {
    /// IBM Db2.
    pub const DB2: &str = "db2";
    /// Apache Derby.
    pub const DERBY: &str = "derby";
    /// MariaDB.
    pub const MARIADB: &str = "mariadb";
    /// Microsoft SQL Server.
    pub const MSSQL: &str = "mssql";
    /// MySQL.
    pub const MYSQL: &str = "mysql";
    /// Oracle Database.
    pub const ORACLE: &str = "oracle";
    /// PostgreSQL.
    pub const POSTGRESQL: &str = "postgresql";
    /// SQLite.
    pub const SQLITE: &str = "sqlite";
    /// Some other SQL database.
    pub const OTHER_SQL: &str = "other_sql";
    /// HyperSQL DataBase.
    pub const HSQLDB: &str = "hsqldb";
    /// H2.
    pub const H2: &str = "h2";
    /// MongoDB.
    pub const MONGODB: &str = "mongodb";
    /// Apache Cassandra.
    pub const CASSANDRA: &str = "cassandra";
    /// Redis.
    pub const REDIS: &str = "redis";
}
