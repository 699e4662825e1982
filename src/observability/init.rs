//! Tracing initialization and subscriber setup.
//!
//! Installs the global subscriber: an env filter, a human-readable `fmt` layer
//! on stderr, and an OpenTelemetry layer whose spans end up in the trace file.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use std::sync::OnceLock;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported on every exported span.
const SERVICE_NAME: &str = "ecocampus";

/// Trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "ecocampus-traces.jsonl";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Directive used when `RUST_LOG` is not set.
fn default_directive(config: &Config) -> String {
    config
        .trace_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string()
}

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `info`. Spans are also exported to
/// `<data_dir>/ecocampus-traces.jsonl`; if the data directory cannot be
/// created, only the stderr layer is installed.
///
/// Only the first call has any effect.
///
/// # Example
///
/// ```rust
/// use ecocampus::observability::init_tracing;
/// use ecocampus::Config;
///
/// let dir = tempfile::tempdir()?;
/// let config = Config {
///     data_dir: dir.path().to_path_buf(),
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
///
/// init_tracing(&config);
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn init_tracing(config: &Config) {
    if INITIALIZED.set(()).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let dir_result = std::fs::create_dir_all(&config.data_dir);
    let otel_layer = dir_result.as_ref().ok().map(|_| {
        let provider =
            tracer::create_tracer_provider(config.data_dir.join(TRACE_FILE_NAME), SERVICE_NAME);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();

    if let Err(e) = dir_result {
        tracing::warn!(data_dir = ?config.data_dir, error = %e, "span export disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_level_falls_back_to_info() {
        let mut config = Config::default();
        assert_eq!(default_directive(&config), "info");

        config.trace_level = Some("  ".to_string());
        assert_eq!(default_directive(&config), "info");

        config.trace_level = Some("ecocampus=trace".to_string());
        assert_eq!(default_directive(&config), "ecocampus=trace");
    }
}
