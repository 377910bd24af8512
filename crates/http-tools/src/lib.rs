//! Shared HTTP helpers for AnyRest MCP.
//!
//! Used by:
//! - `anyrest-openapi-tools` (request composition for `OpenAPI`-derived tools)
//! - `anyrest-mcp-adapter` (spec URL validation, error messages surfaced to MCP clients)
//!
//! It intentionally contains **no** `OpenAPI` knowledge.

pub mod encoding;
pub mod error;
pub mod safety;
pub mod semantics;

pub use error::{HttpToolsError, Result};
