//! MCP server exposing an [`OpenApiToolSource`] over rmcp.
//!
//! Tools are only known at runtime, so the router is assembled from one dynamic route per
//! [`OperationTool`] instead of `#[tool]`-annotated methods.

use anyrest_http_tools::safety::sanitize_reqwest_error;
use anyrest_openapi_tools::{OpenApiToolSource, OpenApiToolsError, OperationTool};
use futures::FutureExt as _;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use rmcp::model::{CallToolResult, Implementation, JsonObject, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool_handler};
use std::sync::Arc;

#[derive(Clone)]
pub struct OpenApiServer {
    tool_router: ToolRouter<Self>,
    instructions: String,
}

impl OpenApiServer {
    /// Build a server for `source`; `None` serves zero tools.
    #[must_use]
    pub fn new(source: Option<&OpenApiToolSource>) -> Self {
        let instructions = match source {
            Some(src) => format!(
                "Tools generated from an OpenAPI document. Each tool performs one HTTP request{}.",
                src.base_url()
                    .map(|base| format!(" against {base}"))
                    .unwrap_or_default()
            ),
            None => "The OpenAPI document could not be loaded; no tools are available.".to_string(),
        };

        Self {
            tool_router: build_tool_router(source),
            instructions,
        }
    }

    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }
}

#[tool_handler]
impl ServerHandler for OpenApiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// One route per registered tool.
pub fn build_tool_router<S>(source: Option<&OpenApiToolSource>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    for tool in source.map(OpenApiToolSource::tools).unwrap_or_default() {
        router = router.with_route(tool_route(tool.clone()));
    }
    router
}

fn tool_route<S>(tool: Arc<OperationTool>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(tool.to_mcp_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let tool = tool.clone();
        async move { dispatch(&tool, &args).await }.boxed()
    })
}

async fn dispatch(tool: &OperationTool, args: &JsonObject) -> Result<CallToolResult, McpError> {
    tracing::debug!(tool = %tool.name(), "Calling tool");
    match tool.invoke(args).await {
        Ok(output) => Ok(output.into_call_tool_result()),
        Err(e) => {
            tracing::warn!(tool = %tool.name(), error = %e, "Tool call failed");
            Err(to_mcp_error(&e))
        }
    }
}

/// Caller mistakes become `invalid_params`; everything else is an internal error with any URL
/// credentials or query strings stripped.
fn to_mcp_error(e: &OpenApiToolsError) -> McpError {
    if e.is_invalid_call() {
        return McpError::invalid_params(e.to_string(), None);
    }
    let message = match e {
        OpenApiToolsError::Transport(err) => {
            format!("HTTP transport error: {}", sanitize_reqwest_error(err))
        }
        other => other.to_string(),
    };
    McpError::internal_error(message, None)
}
