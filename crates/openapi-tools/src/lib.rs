//! `OpenAPI` → MCP tool conversion.
//!
//! - [`parser::parse`] turns `OpenAPI` JSON into a flat [`Document`]
//! - [`schema::build_input_schema`] derives a tool's JSON Schema from its parameters
//! - [`OperationTool`] composes and sends one HTTP request per call
//! - [`OpenApiToolSource`] loads a spec URL and registers every operation as a tool
//!
//! No transport or protocol server lives here; hosts wrap [`OpenApiToolSource`].

pub mod config;
pub mod document;
pub mod error;
pub mod parser;
pub mod runtime;
pub mod schema;
pub mod tool;

pub use config::ToolSourceConfig;
pub use document::{Document, Operation, ParamLocation, Parameter};
pub use error::{OpenApiToolsError, Result};
pub use runtime::OpenApiToolSource;
pub use tool::{OperationTool, PreparedRequest, ToolOutput};
