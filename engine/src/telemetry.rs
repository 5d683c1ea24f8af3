//! Telemetry and Observability
//!
//! Structured logging for the gateway. Every dispatch runs inside a span
//! carrying its dispatch id; the JSON format keeps that span on each event so
//! provider attempts can be grouped per query.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "MEDARION_LOG";

/// HTTP client internals stay at `warn` unless the gateway itself traces
const TRANSPORT_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Filter directives for a configured level, e.g. `"debug"`
pub fn default_directives(log_level: &str) -> String {
    let level = log_level.trim().to_lowercase();
    let transport_level = if level == "trace" { "trace" } else { "warn" };

    let mut directives = vec![
        level.clone(),
        format!("medarion_engine={}", level),
        format!("medarion={}", level),
    ];
    directives.extend(
        TRANSPORT_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, transport_level)),
    );
    directives.join(",")
}

/// Build the filter: `MEDARION_LOG`, then `RUST_LOG`, then the config level
fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_directives(log_level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")))
}

/// Initialize the tracing subscriber with the given log level from config.
///
/// In debug builds: pretty-printed terminal output.
/// In release builds: JSON with the current dispatch span on every event.
/// Logs go to stderr; stdout carries only command output.
pub fn init_telemetry_with_level(log_level: &str) {
    let env_filter = build_filter(log_level);

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
