//! Daemon entry point for the Tako MCP server.
//!
//! Loads configuration from CLI arguments and the environment, builds the
//! Tako client, and serves MCP over stdio or streamable HTTP depending on the
//! deployment environment.

mod client;
mod config;
mod logging;

use tako_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;

use crate::client::build_control_plane;
use crate::config::{TakoConfig, Transport};
use crate::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = TakoConfig::from_args()?;
    init_tracing(config.log_format);

    let control = build_control_plane(&config)?;
    info!(base_url = %config.base_url, transport = ?config.transport, "starting tako-mcpd");

    match config.transport {
        Transport::Stdio => serve_stdio(control).await,
        Transport::StreamableHttp => {
            let http = McpHttpServerConfig::new(config.http_addr)
                .with_stateful_mode(config.stateful_mode);
            serve_streamable_http(control, http).await
        }
    }
}
