//! Error types for the MCP adapter.

use anyrest_openapi_tools::OpenApiToolsError;
use thiserror::Error;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (invalid log filter, conflicting flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The spec could not be loaded or turned into tools.
    #[error("Tool registration failed: {0}")]
    Registration(#[from] OpenApiToolsError),

    /// Startup errors (HTTP client or MCP transport failed to start)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Runtime errors (MCP service task failed)
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
