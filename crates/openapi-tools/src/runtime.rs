//! `OpenAPI` tool source runtime.
//!
//! Loads an `OpenAPI` JSON document from a URL, turns every operation into an
//! [`OperationTool`], and dispatches `tools/call` by name.

use crate::config::ToolSourceConfig;
use crate::document::Document;
use crate::error::{OpenApiToolsError, Result};
use crate::parser;
use crate::tool::{OperationTool, ToolOutput};
use anyrest_http_tools::safety::{redact_url, sanitize_reqwest_error, validate_http_url};
use reqwest::Client;
use rmcp::model::{JsonObject, Tool};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// A set of tools generated from one `OpenAPI` document.
///
/// Cheap to clone; the tool list is immutable after construction.
#[derive(Debug, Clone)]
pub struct OpenApiToolSource {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    document: Document,
    /// Effective base URL (config override, else the document's server URL).
    base_url: Option<String>,
    /// Registered tools in document order, names unique.
    tools: Vec<Arc<OperationTool>>,
}

impl OpenApiToolSource {
    /// Build tools from an already-parsed document.
    ///
    /// Tool names are the operation ids; repeated ids are suffixed `_1`, `_2`, ... in document
    /// order so every tool stays addressable.
    ///
    /// # Errors
    ///
    /// Returns an error if an operation carries an invalid HTTP method.
    pub fn from_document(
        document: Document,
        client: Client,
        config: &ToolSourceConfig,
    ) -> Result<Self> {
        Self::build(document, client, config, None)
    }

    /// Fetch the spec from `config.spec_url`, parse it, and register its operations.
    ///
    /// # Errors
    ///
    /// - [`OpenApiToolsError::InvalidSpecUrl`] for a blank, relative or non-http(s) URL
    /// - [`OpenApiToolsError::SpecFetch`] / [`OpenApiToolsError::SpecReadBody`] if the
    ///   document cannot be retrieved (including non-2xx responses)
    /// - [`OpenApiToolsError::MalformedDocument`] if the body is not an `OpenAPI` JSON object
    /// - [`OpenApiToolsError::Startup`] if all of the above does not finish in time
    pub async fn load(config: &ToolSourceConfig, client: Client) -> Result<Self> {
        let spec_url = validate_http_url(&config.spec_url)?;
        let startup_timeout = config.startup_timeout();

        let startup = async {
            let text = fetch_spec(&client, &spec_url).await?;
            parser::parse(&text)
        };
        let document = match tokio::time::timeout(startup_timeout, startup).await {
            Ok(Ok(document)) => document,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(OpenApiToolsError::Startup(format!(
                    "Startup timeout after {}s loading OpenAPI spec '{}'",
                    startup_timeout.as_secs(),
                    redact_url(&spec_url)
                )));
            }
        };

        Self::build(document, client, config, Some(&spec_url))
    }

    fn build(
        document: Document,
        client: Client,
        config: &ToolSourceConfig,
        spec_url: Option<&Url>,
    ) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .or_else(|| document.server_url.clone())
            .map(|base| resolve_base_url(&base, spec_url));
        if base_url.is_none() {
            tracing::warn!("No server URL in OpenAPI spec and no base URL configured; tool calls will fail");
        }

        let timeout = config.call_timeout();
        let mut names = HashSet::new();
        let mut tools = Vec::with_capacity(document.operations.len());
        for operation in &document.operations {
            let name = reserve_unique_tool_name(&mut names, &operation.operation_id);
            if name != operation.operation_id {
                tracing::warn!(
                    operation_id = %operation.operation_id,
                    path = %operation.path,
                    method = %operation.http_method,
                    tool = %name,
                    "Duplicate operationId; registering under a suffixed name"
                );
            }
            let tool = OperationTool::new(operation.clone(), &document, client.clone())?
                .with_name(name)
                .with_base_url(base_url.as_deref())
                .with_timeout(timeout);
            tools.push(Arc::new(tool));
        }

        tracing::info!("Registered {} tools from OpenAPI spec", tools.len());

        Ok(Self {
            inner: Arc::new(Inner {
                document,
                base_url,
                tools,
            }),
        })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.inner.base_url.as_deref()
    }

    #[must_use]
    pub fn tools(&self) -> &[Arc<OperationTool>] {
        &self.inner.tools
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tools.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<OperationTool>> {
        self.inner.tools.iter().find(|t| t.name() == name)
    }

    /// MCP descriptors for every registered tool, in document order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner.tools.iter().map(|t| t.to_mcp_tool()).collect()
    }

    /// Invoke a tool by name.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiToolsError::ToolNotFound`] for unknown names, otherwise whatever
    /// [`OperationTool::invoke`] returns.
    pub async fn call_tool(&self, name: &str, arguments: &JsonObject) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| OpenApiToolsError::ToolNotFound(name.to_string()))?;
        tool.invoke(arguments).await
    }
}

/// GET the spec document and return its body text.
///
/// # Errors
///
/// Returns [`OpenApiToolsError::SpecFetch`] on transport failures or non-2xx statuses, and
/// [`OpenApiToolsError::SpecReadBody`] if the body cannot be read.
pub async fn fetch_spec(client: &Client, spec_url: &Url) -> Result<String> {
    let display_url = redact_url(spec_url);
    tracing::info!("Fetching OpenAPI spec from {display_url}");

    let resp = client
        .get(spec_url.clone())
        .send()
        .await
        .map_err(|e| OpenApiToolsError::SpecFetch {
            url: display_url.clone(),
            message: sanitize_reqwest_error(&e),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(OpenApiToolsError::SpecFetch {
            url: display_url,
            message: format!("HTTP {status}"),
        });
    }

    resp.text()
        .await
        .map_err(|e| OpenApiToolsError::SpecReadBody {
            url: display_url,
            message: sanitize_reqwest_error(&e),
        })
}

/// `OpenAPI` allows relative server URLs (e.g. `/api/v3`). Resolve them against the spec URL when
/// there is one; otherwise keep the value and let calls fail with an invalid-URL error.
fn resolve_base_url(base_url: &str, spec_url: Option<&Url>) -> String {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return base_url.to_string();
    }

    if let Some(spec_url) = spec_url {
        let mut spec_url = spec_url.clone();
        spec_url.set_fragment(None);
        spec_url.set_query(None);
        match spec_url.join(base_url) {
            Ok(resolved) => return resolved.to_string(),
            Err(e) => tracing::warn!(base_url, error = %e, "Could not resolve relative server URL"),
        }
    }
    base_url.to_string()
}

fn reserve_unique_tool_name(tool_names: &mut HashSet<String>, base: &str) -> String {
    let base = base.to_string();
    if tool_names.insert(base.clone()) {
        return base;
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{base}_{counter}");
        if tool_names.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
