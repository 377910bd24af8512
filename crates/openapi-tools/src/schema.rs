//! Invocation schema generation.

use crate::document::Parameter;
use rmcp::model::JsonObject;
use serde_json::{Value, json};

/// Map an `OpenAPI` primitive type to the JSON Schema type advertised to clients.
///
/// The table is closed: anything not listed (including unknown or absent types) is a string.
#[must_use]
pub fn map_parameter_type(openapi_type: &str) -> &'static str {
    match openapi_type {
        "integer" | "number" => "number",
        "boolean" => "boolean",
        "array" => "array",
        _ => "string",
    }
}

/// Build the `{"type":"object", ...}` input schema for a set of parameters.
///
/// `required` is omitted entirely when no parameter is required. A name declared in more than
/// one location yields a single property (first declaration wins) and at most one `required`
/// entry.
#[must_use]
pub fn build_input_schema(parameters: &[Parameter]) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut required: Vec<Value> = Vec::new();

    for param in parameters {
        if param.required && !required.iter().any(|r| r.as_str() == Some(param.name.as_str())) {
            required.push(Value::String(param.name.clone()));
        }
        if properties.contains_key(&param.name) {
            // The same name in two locations (e.g. path and query) maps to one argument.
            tracing::warn!(
                parameter = %param.name,
                "Parameter declared more than once; keeping the first declaration in the schema"
            );
            continue;
        }

        let schema_type = map_parameter_type(&param.param_type);
        let mut prop = json!({
            "type": schema_type,
            "description": param.description,
        });
        if schema_type == "array" {
            // MCP clients reject array schemas without `items`.
            prop["items"] = json!({});
        }
        properties.insert(param.name.clone(), prop);
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema
}
