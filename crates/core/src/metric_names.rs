//! Well-known metric name constants for SAP Cloud Connector subaccounts.
//!
//! The canonical names are used in override documents, samples and reports.
//! The legacy names are the parameter keys of the original Check_MK rule set
//! and are accepted as aliases on ingestion.

/// Number of application connections of a subaccount.
pub const METRIC_APP_CONNECTIONS: &str = "application-connections";

/// Number of tunnel connections of a subaccount.
pub const METRIC_TUNNEL_CONNECTIONS: &str = "tunnel-connections";

/// Time a tunnel connection has been active, in seconds.
pub const METRIC_TUNNEL_CONNECTION_AGE: &str = "tunnel-connection-age";

pub const LEGACY_APP_CONN_LEVELS: &str = "app_conn_levels";
pub const LEGACY_CONN_NUM_LEVELS: &str = "conn_num_levels";
pub const LEGACY_CONN_TIME_LEVELS: &str = "conn_time_levels";

/// All canonical metric names, in report order.
pub const KNOWN_METRICS: &[&str] = &[
    METRIC_APP_CONNECTIONS,
    METRIC_TUNNEL_CONNECTIONS,
    METRIC_TUNNEL_CONNECTION_AGE,
];

/// Map a legacy parameter key to its canonical metric name. Anything else is
/// returned unchanged.
pub fn canonical_metric_name(name: &str) -> &str {
    match name {
        LEGACY_APP_CONN_LEVELS => METRIC_APP_CONNECTIONS,
        LEGACY_CONN_NUM_LEVELS => METRIC_TUNNEL_CONNECTIONS,
        LEGACY_CONN_TIME_LEVELS => METRIC_TUNNEL_CONNECTION_AGE,
        other => other,
    }
}
