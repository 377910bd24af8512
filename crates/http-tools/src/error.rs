use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpToolsError {
    /// The URL is empty, relative, or unparseable.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The URL parsed but uses a scheme other than `http`/`https`.
    #[error("unsupported URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },
}

pub type Result<T> = std::result::Result<T, HttpToolsError>;
