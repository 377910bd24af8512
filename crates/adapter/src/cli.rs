//! Command-line and environment configuration.

use anyrest_openapi_tools::ToolSourceConfig;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Expose an `OpenAPI`-described REST API as MCP tools over stdio.
#[derive(Debug, Parser)]
#[command(name = "anyrest-mcp-adapter", version, about)]
pub struct Cli {
    /// Absolute http(s) URL of the `OpenAPI` JSON document
    #[arg(long, env = "ANYREST_SPEC_URL")]
    pub spec_url: String,

    /// Base URL for API calls (overrides the document's `servers[0].url`)
    #[arg(long, env = "ANYREST_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-call timeout in seconds (0 = no explicit timeout)
    #[arg(long, env = "ANYREST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Upper bound in seconds on fetching and parsing the spec
    #[arg(long, env = "ANYREST_STARTUP_TIMEOUT_SECS", default_value_t = 30)]
    pub startup_timeout_secs: u64,

    /// Log filter (`RUST_LOG` syntax); `RUST_LOG` takes precedence when set
    #[arg(long, env = "ANYREST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (always written to stderr)
    #[arg(long, env = "ANYREST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Keep serving (with zero tools) when the spec cannot be loaded
    #[arg(long, env = "ANYREST_ALLOW_EMPTY")]
    pub allow_empty: bool,

    /// Print the parsed document as JSON to stdout and exit instead of serving MCP
    #[arg(long, conflicts_with = "allow_empty")]
    pub print_document: bool,
}

impl Cli {
    #[must_use]
    pub fn source_config(&self) -> ToolSourceConfig {
        ToolSourceConfig {
            spec_url: self.spec_url.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            startup_timeout_secs: self.startup_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_flags_into_source_config() {
        let cli = Cli::try_parse_from([
            "anyrest-mcp-adapter",
            "--spec-url",
            "https://petstore.example.com/openapi.json",
            "--base-url",
            "https://api.example.com",
            "--timeout-secs",
            "10",
            "--log-format",
            "json",
            "--allow-empty",
        ])
        .expect("valid args");

        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.allow_empty);

        let config = cli.source_config();
        assert_eq!(config.spec_url, "https://petstore.example.com/openapi.json");
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.startup_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["anyrest-mcp-adapter", "--spec-url", "http://localhost/x"])
            .expect("valid args");
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(!cli.allow_empty);
        assert!(!cli.print_document);
        assert_eq!(cli.source_config().call_timeout(), None);
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();
    }
}
