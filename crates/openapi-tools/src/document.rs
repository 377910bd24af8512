//! Normalized in-memory view of an `OpenAPI` document.
//!
//! Only the flat subset needed to build tools is kept: the first server URL and, per
//! path+verb, the operation id, description, parameters and the `200` response description.

use serde::Serialize;

/// Fallback `operationId` for operations that do not declare one. Not unique.
pub const DEFAULT_OPERATION_ID: &str = "Operation";
/// Fallback parameter name.
pub const DEFAULT_PARAMETER_NAME: &str = "param";
/// Fallback parameter type (`schema.type`).
pub const DEFAULT_PARAMETER_TYPE: &str = "string";
/// Fallback return description when `responses."200".description` is absent.
pub const DEFAULT_RETURN_DESCRIPTION: &str = "Result";

/// Parsed document: base URL plus operations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `servers[0].url`, if present.
    pub server_url: Option<String>,
    pub operations: Vec<Operation>,
}

/// One HTTP method on one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    pub description: String,
    /// Raw path template, e.g. `/pets/{id}`.
    pub path: String,
    /// Upper-cased verb, e.g. `GET`.
    pub http_method: String,
    pub parameters: Vec<Parameter>,
    pub return_description: String,
}

impl Operation {
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("GET")
    }

    /// Parameters routed to the given location, in declaration order.
    pub fn parameters_in(&self, location: ParamLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub description: String,
    /// `OpenAPI` primitive type name as declared (`schema.type`).
    #[serde(rename = "type")]
    pub param_type: String,
    pub location: ParamLocation,
    pub required: bool,
}

/// Where an argument is routed when the request is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    /// Anything that is not `path` or `query` (header, cookie, formData, body, ...).
    Body,
}

impl ParamLocation {
    /// Map an `OpenAPI` `in` value to a routing location.
    #[must_use]
    pub fn from_openapi(location: &str) -> Self {
        match location {
            "path" => Self::Path,
            "query" => Self::Query,
            _ => Self::Body,
        }
    }
}
