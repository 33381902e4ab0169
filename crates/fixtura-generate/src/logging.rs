use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

/// Installs a human-readable subscriber writing through the test harness.
///
/// `filter` uses `EnvFilter` syntax, e.g. `fixtura_generate=debug`; an
/// unparsable filter falls back to `info`. Returns false when a global
/// subscriber is already installed.
pub fn init_tracing(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Same as [`init_tracing`] with JSON lines and RFC 3339 UTC timestamps.
pub fn init_json_tracing(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_env_filter(env_filter(filter))
        .with_test_writer()
        .try_init()
        .is_ok()
}

fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
}
