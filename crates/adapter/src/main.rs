//! `anyrest-mcp-adapter`: serve every operation of an `OpenAPI` document as an MCP tool over
//! stdio.

mod cli;
mod error;
mod logging;
mod server;

use crate::cli::Cli;
use crate::error::{AdapterError, Result};
use crate::server::OpenApiServer;
use anyrest_openapi_tools::OpenApiToolSource;
use clap::Parser as _;
use rmcp::ServiceExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Adapter exited with an error");
        return Err(e.into());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting anyrest-mcp-adapter");

    let client = build_http_client()?;
    let source = load_source(&cli, client).await?;
    if cli.print_document {
        println!("{}", render_document(source.as_ref())?);
        return Ok(());
    }

    let server = OpenApiServer::new(source.as_ref());
    tracing::info!(tools = server.tool_count(), "Serving MCP over stdio");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| AdapterError::Startup(format!("failed to start MCP stdio transport: {e}")))?;

    tokio::select! {
        res = service.waiting() => {
            let reason = res.map_err(|e| AdapterError::Runtime(e.to_string()))?;
            tracing::info!(?reason, "MCP session ended");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }
    Ok(())
}

/// A single pooled client shared by every tool.
fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AdapterError::Startup(format!("failed to build HTTP client: {e}")))
}

async fn load_source(cli: &Cli, client: reqwest::Client) -> Result<Option<OpenApiToolSource>> {
    match OpenApiToolSource::load(&cli.source_config(), client).await {
        Ok(source) => Ok(Some(source)),
        Err(e) if cli.allow_empty => {
            tracing::warn!(error = %e, "Failed to load OpenAPI spec; serving zero tools (--allow-empty)");
            Ok(None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load OpenAPI spec");
            Err(AdapterError::Registration(e))
        }
    }
}

/// Pretty JSON view of the parsed document, for `--print-document`.
fn render_document(source: Option<&OpenApiToolSource>) -> Result<String> {
    let source = source
        .ok_or_else(|| AdapterError::Config("no document loaded to print".to_string()))?;
    serde_json::to_string_pretty(source.document())
        .map_err(|e| AdapterError::Runtime(format!("failed to render document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyrest_test_support::spawn_echo_api;
    use clap::Parser as _;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["anyrest-mcp-adapter"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    #[tokio::test]
    async fn load_failure_aborts_by_default() {
        let server = spawn_echo_api(None).await.expect("server");
        let spec_url = format!("{}/openapi.json", server.base_url);
        let err = load_source(&cli(&["--spec-url", &spec_url]), reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Registration(_)), "{err}");
    }

    #[tokio::test]
    async fn load_failure_is_tolerated_with_allow_empty() {
        let source = load_source(
            &cli(&["--spec-url", "not a url", "--allow-empty"]),
            reqwest::Client::new(),
        )
        .await
        .expect("tolerated");
        assert!(source.is_none());
    }

    #[tokio::test]
    async fn loads_tools_from_spec_url() {
        let spec = r#"{"paths": {"/status": {"get": {"operationId": "status"}}}}"#;
        let server = spawn_echo_api(Some(spec.to_string())).await.expect("server");
        let spec_url = format!("{}/openapi.json", server.base_url);
        let source = load_source(&cli(&["--spec-url", &spec_url]), build_http_client().expect("client"))
            .await
            .expect("load")
            .expect("source");
        assert_eq!(OpenApiServer::new(Some(&source)).tool_count(), 1);
    }

    #[tokio::test]
    async fn renders_parsed_document_as_json() {
        let spec = r#"{"servers": [{"url": "https://api.example.com"}],
            "paths": {"/pets/{id}": {"get": {"operationId": "getPet",
                "parameters": [{"name": "id", "in": "path", "required": true}]}}}}"#;
        let server = spawn_echo_api(Some(spec.to_string())).await.expect("server");
        let spec_url = format!("{}/openapi.json", server.base_url);
        let source = load_source(&cli(&["--spec-url", &spec_url, "--print-document"]), reqwest::Client::new())
            .await
            .expect("load");

        let rendered: serde_json::Value =
            serde_json::from_str(&render_document(source.as_ref()).expect("render")).expect("json");
        assert_eq!(rendered["serverUrl"], "https://api.example.com");
        assert_eq!(rendered["operations"][0]["operationId"], "getPet");
        assert_eq!(rendered["operations"][0]["parameters"][0]["location"], "path");

        assert!(matches!(render_document(None), Err(AdapterError::Config(_))));
    }
}
