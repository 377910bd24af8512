//! `OpenAPI` JSON → [`Document`].
//!
//! Parsing is lenient at the field level (missing fields fall back to documented defaults) but
//! strict at the structural level: text that is not JSON, a non-object root, or a `paths`
//! section that is not a map of path items is a [`OpenApiToolsError::MalformedDocument`].

use crate::document::{
    DEFAULT_OPERATION_ID, DEFAULT_PARAMETER_NAME, DEFAULT_PARAMETER_TYPE,
    DEFAULT_RETURN_DESCRIPTION, Document, Operation, ParamLocation, Parameter,
};
use crate::error::{OpenApiToolsError, Result};
use serde_json::{Map, Value};

/// Path-item keys that describe an operation. Everything else (`parameters`, `summary`,
/// `servers`, `$ref`, extensions) is ignored.
const HTTP_VERBS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parse `OpenAPI` JSON text into a [`Document`].
///
/// # Errors
///
/// Returns [`OpenApiToolsError::MalformedDocument`] if the text is not valid JSON, the root is
/// not an object, `paths` is not an object, or a path item is not an object.
pub fn parse(json_text: &str) -> Result<Document> {
    let root: Value = serde_json::from_str(json_text)
        .map_err(|e| OpenApiToolsError::MalformedDocument(format!("invalid JSON: {e}")))?;

    let Value::Object(root) = root else {
        return Err(OpenApiToolsError::MalformedDocument(
            "top-level value must be a JSON object".to_string(),
        ));
    };

    let server_url = first_server_url(&root);
    let operations = match root.get("paths") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(paths)) => parse_paths(paths)?,
        Some(_) => {
            return Err(OpenApiToolsError::MalformedDocument(
                "'paths' must be a JSON object".to_string(),
            ));
        }
    };

    tracing::info!(
        operations = operations.len(),
        server_url = server_url.as_deref().unwrap_or("<none>"),
        "Parsed OpenAPI document"
    );

    Ok(Document {
        server_url,
        operations,
    })
}

fn first_server_url(root: &Map<String, Value>) -> Option<String> {
    root.get("servers")?
        .as_array()?
        .iter()
        .find_map(|server| server.get("url").and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_paths(paths: &Map<String, Value>) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    for (path, item) in paths {
        let Value::Object(item) = item else {
            return Err(OpenApiToolsError::MalformedDocument(format!(
                "path item '{path}' must be a JSON object"
            )));
        };

        for (key, op) in item {
            let verb = key.to_ascii_lowercase();
            if !HTTP_VERBS.contains(&verb.as_str()) {
                continue;
            }
            let operation = parse_operation(path, &verb, op);
            tracing::debug!(
                operation_id = %operation.operation_id,
                method = %operation.http_method,
                path = %operation.path,
                parameters = operation.parameters.len(),
                "Discovered operation"
            );
            operations.push(operation);
        }
    }
    Ok(operations)
}

fn parse_operation(path: &str, verb: &str, op: &Value) -> Operation {
    let operation_id = non_empty_str(op.get("operationId"))
        .unwrap_or(DEFAULT_OPERATION_ID)
        .to_string();
    let description = str_field(op, "description").unwrap_or(&operation_id).to_string();

    let parameters = op
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| parse_parameter(&operation_id, p))
                .collect()
        })
        .unwrap_or_default();

    let return_description = op
        .get("responses")
        .and_then(|r| r.get("200"))
        .and_then(|ok| str_field(ok, "description"))
        .unwrap_or(DEFAULT_RETURN_DESCRIPTION)
        .to_string();

    Operation {
        operation_id,
        description,
        path: path.to_string(),
        http_method: verb.to_ascii_uppercase(),
        parameters,
        return_description,
    }
}

fn parse_parameter(operation_id: &str, p: &Value) -> Option<Parameter> {
    if !p.is_object() {
        tracing::warn!(operation_id, "Skipping parameter entry that is not a JSON object");
        return None;
    }

    let name = str_field(p, "name")
        .unwrap_or(DEFAULT_PARAMETER_NAME)
        .to_string();
    let description = str_field(p, "description").unwrap_or(&name).to_string();
    let param_type = p
        .get("schema")
        .and_then(|s| str_field(s, "type"))
        .unwrap_or(DEFAULT_PARAMETER_TYPE)
        .to_string();
    let location = ParamLocation::from_openapi(str_field(p, "in").unwrap_or("query"));
    // Only a literal JSON `true` marks a parameter as required.
    let required = matches!(p.get("required"), Some(Value::Bool(true)));

    Some(Parameter {
        name,
        description,
        param_type,
        location,
        required,
    })
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op<'a>(doc: &'a Document, operation_id: &str) -> &'a Operation {
        doc.operations
            .iter()
            .find(|op| op.operation_id == operation_id)
            .unwrap_or_else(|| panic!("operation {operation_id} not parsed"))
    }

    const PETSTORE: &str = r#"{
        "openapi": "3.0.1",
        "servers": [{ "url": "https://api.example.com" }, { "url": "https://backup.example.com" }],
        "paths": {
            "/pets/{id}": {
                "parameters": [{ "name": "ignored", "in": "query" }],
                "get": {
                    "operationId": "getPet",
                    "description": "Fetch one pet",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                    ],
                    "responses": { "200": { "description": "The pet" } }
                },
                "delete": {
                    "operationId": "deletePet",
                    "parameters": [{ "name": "id", "in": "path", "required": true }]
                }
            },
            "/pets": {
                "post": {
                    "operationId": "addPet",
                    "parameters": [
                        { "name": "name", "in": "body", "required": "yes" },
                        { "name": "tag", "description": "Free-form tag" }
                    ],
                    "responses": { "201": { "description": "Created" } }
                }
            }
        }
    }"#;

    #[test]
    fn parses_server_url_and_operations_in_document_order() {
        let doc = parse(PETSTORE).expect("valid document");
        assert_eq!(doc.server_url.as_deref(), Some("https://api.example.com"));

        let summary: Vec<_> = doc
            .operations
            .iter()
            .map(|op| (op.http_method.as_str(), op.path.as_str(), op.operation_id.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("GET", "/pets/{id}", "getPet"),
                ("DELETE", "/pets/{id}", "deletePet"),
                ("POST", "/pets", "addPet"),
            ]
        );
    }

    #[test]
    fn key_order_is_insertion_order_not_sorted() {
        let doc = parse(
            r#"{"paths": {
                "/zebra": { "post": {"operationId": "z"}, "get": {"operationId": "zg"} },
                "/alpha": { "get": {"operationId": "a"} }
            }}"#,
        )
        .expect("valid");
        let ids: Vec<_> = doc.operations.iter().map(|o| o.operation_id.as_str()).collect();
        assert_eq!(ids, ["z", "zg", "a"]);
    }

    #[test]
    fn counts_one_operation_per_path_and_verb() {
        let doc = parse(
            r#"{"paths": {
                "/a": { "get": {}, "put": {}, "post": {}, "delete": {}, "summary": "x" },
                "/b": { "patch": {}, "head": {}, "options": {}, "trace": {} },
                "/c": {}
            }}"#,
        )
        .expect("valid");
        assert_eq!(doc.operations.len(), 8);
        assert!(
            doc.operations
                .iter()
                .all(|op| op.http_method == op.http_method.to_ascii_uppercase())
        );
    }

    #[test]
    fn applies_operation_defaults() {
        let doc = parse(r#"{"paths": {"/x": {"get": {}, "post": {"operationId": ""}}}}"#)
            .expect("valid");
        for op in &doc.operations {
            assert_eq!(op.operation_id, "Operation");
            assert_eq!(op.description, "Operation");
            assert_eq!(op.return_description, "Result");
            assert!(op.parameters.is_empty());
        }
    }

    #[test]
    fn description_defaults_to_operation_id() {
        let doc = parse(PETSTORE).expect("valid");
        let delete = op(&doc, "deletePet");
        assert_eq!(delete.description, "deletePet");
        assert_eq!(delete.return_description, "Result");
    }

    #[test]
    fn return_description_only_reads_200() {
        let doc = parse(PETSTORE).expect("valid");
        assert_eq!(op(&doc, "getPet").return_description, "The pet");
        assert_eq!(op(&doc, "addPet").return_description, "Result");
    }

    #[test]
    fn applies_parameter_defaults() {
        let doc = parse(
            r#"{"paths": {"/x": {"post": {"operationId": "x", "parameters": [
                {},
                { "name": "limit", "in": "query", "required": true, "schema": { "type": "integer" } },
                "not-an-object"
            ]}}}}"#,
        )
        .expect("valid");
        let params = &doc.operations[0].parameters;
        assert_eq!(params.len(), 2);

        let fallback = &params[0];
        assert_eq!(fallback.name, "param");
        assert_eq!(fallback.description, "param");
        assert_eq!(fallback.param_type, "string");
        assert_eq!(fallback.location, ParamLocation::Query);
        assert!(!fallback.required);

        let limit = &params[1];
        assert_eq!(limit.param_type, "integer");
        assert!(limit.required);
    }

    #[test]
    fn only_literal_true_marks_required() {
        let doc = parse(PETSTORE).expect("valid");
        let add = op(&doc, "addPet");
        assert_eq!(add.parameters[0].location, ParamLocation::Body);
        assert!(!add.parameters[0].required);
        assert_eq!(add.parameters[1].description, "Free-form tag");
        assert_eq!(add.parameters[1].location, ParamLocation::Query);
    }

    #[test]
    fn duplicate_operation_ids_are_kept() {
        let doc = parse(
            r#"{"paths": {
                "/a": { "get": {"operationId": "dup"} },
                "/b": { "get": {"operationId": "dup"} }
            }}"#,
        )
        .expect("valid");
        assert_eq!(doc.operations.len(), 2);
        assert!(doc.operations.iter().all(|op| op.operation_id == "dup"));
    }

    #[test]
    fn missing_servers_leaves_url_unset() {
        let doc = parse(r#"{"servers": [], "paths": {}}"#).expect("valid");
        assert!(doc.server_url.is_none());
        let doc = parse(r#"{"servers": [{"description": "no url"}, {"url": "http://b"}]}"#)
            .expect("valid");
        assert_eq!(doc.server_url.as_deref(), Some("http://b"));
        assert!(doc.operations.is_empty());
    }

    #[test]
    fn invalid_json_is_a_hard_failure() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, OpenApiToolsError::MalformedDocument(_)));
    }

    #[test]
    fn structural_errors_are_malformed() {
        for text in [
            "[]",
            "\"openapi\"",
            r#"{"paths": []}"#,
            r#"{"paths": {"/x": "nope"}}"#,
        ] {
            assert!(
                matches!(parse(text), Err(OpenApiToolsError::MalformedDocument(_))),
                "expected MalformedDocument for {text}"
            );
        }
    }
}
