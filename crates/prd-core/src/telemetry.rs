//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TelemetryFormat {
    /// Human-readable
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the default `info` level. Returns `false` if a
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing(format: TelemetryFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = match format {
        TelemetryFormat::Pretty => builder.try_init(),
        TelemetryFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}
