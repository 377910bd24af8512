//! URL validation and redaction for outbound HTTP.
//!
//! The spec URL handed to the adapter must be an absolute `http(s)` URL. Error messages that
//! leave the process (MCP error responses, logs) go through [`sanitize_reqwest_error`] so that
//! credentials or query tokens embedded in URLs are not echoed back.

use crate::error::{HttpToolsError, Result};
use url::Url;

/// Validate a user-supplied URL: non-empty, absolute, and `http`/`https` only.
///
/// # Errors
///
/// Returns [`HttpToolsError::InvalidUrl`] if the input is blank or not an absolute URL, and
/// [`HttpToolsError::UnsupportedScheme`] for any scheme other than `http`/`https`.
pub fn validate_http_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HttpToolsError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL is empty".to_string(),
        });
    }

    // `Url::parse` only accepts absolute URLs; relative references fail here.
    let url = Url::parse(trimmed).map_err(|e| HttpToolsError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HttpToolsError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(HttpToolsError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Render a `reqwest` error with its URL redacted.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
