//! One `OpenAPI` operation exposed as an invocable tool.
//!
//! An [`OperationTool`] is immutable after construction: the operation definition, the
//! resolved base URL, the generated input schema and a handle to the shared HTTP client.
//! Invocation composes exactly one request:
//!
//! 1. `{name}` placeholders in the path are replaced by percent-encoded argument values
//! 2. query parameters are appended in declaration order
//! 3. for non-GET methods, remaining (body-like) arguments become a flat JSON object body
//!
//! The response body is returned as parsed JSON when possible, otherwise as raw text. The
//! HTTP status code is not interpreted.

use crate::document::{Document, Operation, ParamLocation};
use crate::error::{OpenApiToolsError, Result};
use crate::schema::build_input_schema;
use anyrest_http_tools::encoding::{encode_component, value_to_string};
use anyrest_http_tools::semantics::annotations_for_method;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// `Content-Type` sent with JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A tool backed by a single `OpenAPI` operation.
#[derive(Debug, Clone)]
pub struct OperationTool {
    /// Exposed tool name (the `operationId`, possibly suffixed to stay unique).
    name: String,
    operation: Operation,
    method: Method,
    /// Server URL with trailing `/` removed; `None` when the document has none.
    base_url: Option<String>,
    input_schema: Arc<JsonObject>,
    client: Client,
    timeout: Option<Duration>,
}

/// A fully composed request, before it is handed to the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    /// Flat JSON object body, only for non-GET requests with body-like arguments.
    pub body: Option<Value>,
}

/// Result of a tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// The response body parsed as JSON.
    Json(Value),
    /// The response body verbatim (it was not valid JSON).
    Text(String),
}

impl ToolOutput {
    /// Classify a response body.
    #[must_use]
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    /// Render as an MCP tool result.
    ///
    /// JSON objects are also attached as `structured_content`.
    #[must_use]
    pub fn into_call_tool_result(self) -> CallToolResult {
        match self {
            Self::Text(text) => CallToolResult::success(vec![Content::text(text)]),
            Self::Json(Value::String(s)) => CallToolResult::success(vec![Content::text(s)]),
            Self::Json(value) => {
                let text = serde_json::to_string(&value).unwrap_or_else(|_| value.to_string());
                let structured_content = value.is_object().then_some(value);
                CallToolResult {
                    content: vec![Content::text(text)],
                    structured_content,
                    is_error: Some(false),
                    meta: None,
                }
            }
        }
    }
}

impl OperationTool {
    /// Build a tool for `operation`, resolving requests against the document's server URL.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiToolsError::InvalidMethod`] if the operation's verb is not a valid HTTP
    /// method token.
    pub fn new(operation: Operation, document: &Document, client: Client) -> Result<Self> {
        let method = Method::from_bytes(operation.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| OpenApiToolsError::InvalidMethod(operation.http_method.clone()))?;
        let input_schema = Arc::new(build_input_schema(&operation.parameters));

        Ok(Self {
            name: operation.operation_id.clone(),
            base_url: document.server_url.as_deref().map(trim_base_url),
            operation,
            method,
            input_schema,
            client,
            timeout: None,
        })
    }

    #[must_use]
    pub(crate) fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        self.base_url = base_url.map(trim_base_url);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.operation.description
    }

    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The invocation schema (generated once at construction).
    #[must_use]
    pub fn input_schema(&self) -> &Arc<JsonObject> {
        &self.input_schema
    }

    /// The MCP `Tool` descriptor for this operation.
    #[must_use]
    pub fn to_mcp_tool(&self) -> Tool {
        let mut tool = Tool::new(
            self.name.clone(),
            self.operation.description.clone(),
            self.input_schema.clone(),
        );
        let title = format!("{} {}", self.method, self.operation.path);
        tool.annotations = Some(annotations_for_method(&self.method, Some(title)));
        tool
    }

    /// Compose the request for `arguments` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiToolsError::MissingRequiredParameter`] if a declared path parameter is
    /// absent or null; the placeholder would otherwise be sent literally.
    pub fn build_request(&self, arguments: &JsonObject) -> Result<PreparedRequest> {
        let op = &self.operation;

        let mut path = op.path.clone();
        for param in op.parameters_in(ParamLocation::Path) {
            let Some(value) = arguments.get(&param.name).filter(|v| !v.is_null()) else {
                return Err(OpenApiToolsError::MissingRequiredParameter {
                    operation: self.name.clone(),
                    parameter: param.name.clone(),
                });
            };
            let placeholder = format!("{{{}}}", param.name);
            path = path.replace(&placeholder, &encode_component(&value_to_string(value)));
        }

        let query: Vec<String> = op
            .parameters_in(ParamLocation::Query)
            .filter_map(|param| {
                let value = arguments.get(&param.name).filter(|v| !v.is_null())?;
                Some(format!(
                    "{}={}",
                    encode_component(&param.name),
                    encode_component(&value_to_string(value))
                ))
            })
            .collect();

        let body = if op.is_get() {
            None
        } else {
            let fields: JsonObject = op
                .parameters_in(ParamLocation::Body)
                .filter_map(|param| {
                    arguments
                        .get(&param.name)
                        .map(|value| (param.name.clone(), value.clone()))
                })
                .collect();
            (!fields.is_empty()).then_some(Value::Object(fields))
        };

        let url = compose_url(self.base_url.as_deref(), &path, &query);
        tracing::debug!(
            tool = %self.name,
            method = %self.method,
            url = %url,
            has_body = body.is_some(),
            "Composed request"
        );

        Ok(PreparedRequest {
            method: self.method.clone(),
            url,
            body,
        })
    }

    /// Execute one HTTP request for `arguments` and return the response body.
    ///
    /// # Errors
    ///
    /// - [`OpenApiToolsError::MissingRequiredParameter`] for absent path parameters
    /// - [`OpenApiToolsError::InvalidUrl`] if the composed URL is not absolute (no server URL)
    /// - [`OpenApiToolsError::Transport`] for DNS/connect/TLS/timeout/body-read failures
    pub async fn invoke(&self, arguments: &JsonObject) -> Result<ToolOutput> {
        let prepared = self.build_request(arguments)?;
        let url = Url::parse(&prepared.url).map_err(|e| OpenApiToolsError::InvalidUrl {
            url: prepared.url.clone(),
            message: e.to_string(),
        })?;

        let mut request = self.client.request(prepared.method, url);
        if let Some(body) = &prepared.body {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(serde_json::to_vec(body)?);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(tool = %self.name, status = status.as_u16(), bytes = body.len(), "Tool call completed");

        Ok(ToolOutput::from_body(body))
    }
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn compose_url(base_url: Option<&str>, path: &str, query: &[String]) -> String {
    let mut url = String::from(base_url.unwrap_or_default());
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}
