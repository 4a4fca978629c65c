//! Logging setup utilities for the study room chat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Crate names are normalized to their module form (`studyroom-server` becomes
/// `studyroom_server`) so the directive matches tracing targets.
pub fn default_directive(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={level},{}={level},studyroom_shared={level},tower_http=info",
        crate_name.replace('-', "_"),
        binary_name.replace('-', "_"),
        level = default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate emitting most events (e.g. "studyroom-server")
/// * `binary_name` - The name of the binary (e.g. "studyroom-server", "studyroom-client")
/// * `default_log_level` - The default log level (e.g. "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use studyroom_shared::logger::setup_logger;
///
/// setup_logger("studyroom-server", "studyroom-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_directive(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
