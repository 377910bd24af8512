use crate::cli::LogFormat;
use crate::error::{AdapterError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr: stdout carries MCP frames.
///
/// # Errors
///
/// Returns [`AdapterError::Config`] for an invalid filter and [`AdapterError::Startup`] if a
/// subscriber is already installed.
pub fn init(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| AdapterError::Config(format!("invalid log level '{log_level}': {e}")))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.with_ansi(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| AdapterError::Startup(format!("failed to initialize logging: {e}")))
}
