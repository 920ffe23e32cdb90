//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; binaries and examples call
//! [`init_tracing`] once to decide where they go.

use devconsole_domain::{ConsoleError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over `config.filter`. Returns
/// `Ok(false)` if a global subscriber was already installed.
///
/// # Errors
/// Returns `ConsoleError::Config` if the filter directive does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init().is_ok()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "tracing initialised");
    }
    Ok(installed)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| ConsoleError::Config(format!("Invalid log filter '{}': {e}", config.filter)))
}
