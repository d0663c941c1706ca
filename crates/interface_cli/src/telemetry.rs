//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliError;

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`. With `json` set every event is
/// written as one JSON object per line.
///
/// Returns `false` when a subscriber was already installed; the existing
/// one is kept.
pub fn init_tracing(level: &str, json: bool) -> Result<bool, CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::Telemetry(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing("info", false).unwrap();
        assert!(!init_tracing("debug", true).unwrap());
    }
}
