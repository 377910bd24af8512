//! HTTP method semantics → MCP `ToolAnnotations`.
//!
//! Every `OpenAPI`-derived tool talks to a remote API, so `openWorldHint` is always set.
//! The remaining hints follow RFC 9110 safe/idempotent method definitions.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// `(read_only, destructive, idempotent)` hints for a method, `None` where we should not guess.
type Hints = (Option<bool>, Option<bool>, Option<bool>);

fn hints_for(method: &Method) -> Hints {
    match *method {
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE => {
            (Some(true), Some(false), Some(true))
        }
        Method::POST => (Some(false), Some(false), Some(false)),
        Method::PUT | Method::DELETE => (Some(false), Some(true), Some(true)),
        // PATCH may or may not be idempotent.
        Method::PATCH => (Some(false), Some(true), None),
        _ => (None, None, None),
    }
}

/// Build tool annotations for an operation's HTTP method.
#[must_use]
pub fn annotations_for_method(method: &Method, title: Option<String>) -> ToolAnnotations {
    let (read_only_hint, destructive_hint, idempotent_hint) = hints_for(method);
    ToolAnnotations {
        title,
        read_only_hint,
        destructive_hint,
        idempotent_hint,
        open_world_hint: Some(true),
    }
}
