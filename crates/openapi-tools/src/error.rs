//! Error types for `anyrest-openapi-tools`.

use thiserror::Error;

/// Main error type for `OpenAPI` tooling.
#[derive(Error, Debug)]
pub enum OpenApiToolsError {
    /// The spec text is not JSON, or its top-level shape is not an `OpenAPI` document.
    #[error("Malformed OpenAPI document: {0}")]
    MalformedDocument(String),

    /// The spec URL failed validation (empty, relative, or not http/https).
    #[error("Invalid spec URL: {0}")]
    InvalidSpecUrl(#[from] anyrest_http_tools::HttpToolsError),

    #[error("OpenAPI error: failed to fetch spec from '{url}': {message}")]
    SpecFetch { url: String, message: String },

    #[error("OpenAPI error: failed to read spec body from '{url}': {message}")]
    SpecReadBody { url: String, message: String },

    /// Spec loading did not finish within the startup timeout.
    #[error("Startup error: {0}")]
    Startup(String),

    /// A tool call named a tool this source does not expose.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A declared path parameter was absent (or null) in the call arguments.
    #[error("Missing required parameter '{parameter}' for tool '{operation}'")]
    MissingRequiredParameter { operation: String, parameter: String },

    /// The operation's verb is not a valid HTTP method token.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// The composed request URL could not be parsed (e.g. the document has no server URL).
    #[error("Invalid request URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Transport-level failure (DNS, connect, TLS, timeout, body read).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenApiToolsError {
    /// Whether the error was caused by the caller's arguments rather than the remote side.
    #[must_use]
    pub fn is_invalid_call(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_) | Self::MissingRequiredParameter { .. }
        )
    }
}

/// Result type alias for `OpenAPI` tooling operations.
pub type Result<T> = std::result::Result<T, OpenApiToolsError>;
