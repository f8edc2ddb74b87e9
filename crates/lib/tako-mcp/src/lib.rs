//! MCP server implementation for tako-mcp.
//!
//! This crate wires the control plane into rmcp tool and prompt handlers and
//! exposes the MCP-facing API surface for search and visualization.

mod helpers;
pub mod prompts;
pub mod server;
mod tools;

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::router::prompt::PromptRouter,
    handler::server::tool::ToolRouter,
    prompt_handler,
    tool_handler,
};
use rmcp::model::{
    GetPromptRequestParams,
    GetPromptResult,
    Implementation,
    ListPromptsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use tako_core::control::TakoControlPlane;

pub use tools::search::NO_RESULT_SENTINEL;

const SERVER_INSTRUCTIONS: &str = r"tako-mcp gives access to Tako, a knowledge search and visualization service.

Workflow:
1. `search` takes a natural-language query and returns Tako knowledge cards with data,
   sources, and embeddable visualizations. Search for one metric per query.
2. To chart your own data, either:
   - call `upload_file` with base64 content to get a `file_id`, then `visualize_file`, or
   - call `visualize_dataset` with a dataset in Tako Data Format.
3. `visualize_dataset` validates the dataset before rendering. When it is rejected the
   response explains why; fix the payload and call it again.

Prompts:
- `generate_search_tako_prompt` plans a set of searches for a user question.
- `generate_visualization_prompt` tidies a dataset and enriches it with metadata.";

/// MCP server wrapper around the control plane and its routers.
#[derive(Clone)]
pub struct TakoMcp {
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
    control: Arc<TakoControlPlane>,
}

impl TakoMcp {
    /// Creates a new server using a control plane by value.
    #[must_use]
    pub fn new(control: TakoControlPlane) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control plane handle.
    #[must_use]
    pub fn with_control(control: Arc<TakoControlPlane>) -> Self {
        let tool_router = Self::tool_router_search() + Self::tool_router_visualize();
        Self {
            tool_router,
            prompt_router: Self::prompt_router_templates(),
            control,
        }
    }

    pub(crate) fn control(&self) -> &TakoControlPlane {
        &self.control
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for TakoMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tako_core::client::{ClientError, DataService, SourceIndex, VisualizeTarget};
    use tako_core::control::TakoControlPlane;
    use tempfile::TempDir;

    use crate::TakoMcp;

    /// Data service double that records visualize targets.
    #[derive(Default)]
    pub struct FakeService {
        pub fail: bool,
        pub visualized: Mutex<Vec<VisualizeTarget>>,
    }

    impl FakeService {
        fn outcome<T>(&self, value: T) -> Result<T, ClientError> {
            if self.fail {
                Err(ClientError::Decode("remote exploded".to_string()))
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl DataService for FakeService {
        async fn search(
            &self,
            text: &str,
            _source_indexes: &[SourceIndex],
        ) -> Result<Value, ClientError> {
            self.outcome(json!({ "query": text }))
        }

        async fn upload_file(&self, path: &Path) -> Result<String, ClientError> {
            let bytes = std::fs::read(path)?;
            self.outcome(format!("file-{}", bytes.len()))
        }

        async fn visualize(&self, target: &VisualizeTarget) -> Result<Value, ClientError> {
            self.visualized
                .lock()
                .expect("visualized lock")
                .push(target.clone());
            self.outcome(json!({ "embed_url": "https://trytako.com/embed/x" }))
        }
    }

    pub fn control_plane(fail: bool) -> (Arc<TakoControlPlane>, TempDir) {
        let staging = tempfile::tempdir().expect("tempdir");
        let control = TakoControlPlane::new(FakeService {
            fail,
            ..FakeService::default()
        })
        .with_staging_dir(staging.path());
        (Arc::new(control), staging)
    }

    pub fn server(fail: bool) -> (TakoMcp, TempDir) {
        let (control, staging) = control_plane(fail);
        (TakoMcp::with_control(control), staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::serve_server;
    use serde_json::{Value, json};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, WriteHalf};

    #[test]
    fn registers_every_tool_and_prompt() {
        let (server, _staging) = testing::server(false);

        let mut tools: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        tools.sort();
        assert_eq!(
            tools,
            ["search", "upload_file", "visualize_dataset", "visualize_file"]
        );

        let mut prompts: Vec<String> = server
            .prompt_router
            .list_all()
            .into_iter()
            .map(|prompt| prompt.name.to_string())
            .collect();
        prompts.sort();
        assert_eq!(
            prompts,
            ["generate_search_tako_prompt", "generate_visualization_prompt"]
        );
    }

    #[test]
    fn advertises_tools_and_prompts() {
        let (server, _staging) = testing::server(false);
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(
            info.instructions
                .as_deref()
                .is_some_and(|text| text.contains("visualize_dataset"))
        );
    }

    #[test]
    fn prompts_require_text_argument() {
        let (server, _staging) = testing::server(false);

        for prompt in server.prompt_router.list_all() {
            let arguments = prompt.arguments.expect("prompt arguments");
            assert_eq!(arguments.len(), 1, "{}", prompt.name);
            assert_eq!(arguments[0].name, "text");
            assert_eq!(arguments[0].required, Some(true));
        }
    }

    async fn send(writer: &mut WriteHalf<DuplexStream>, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        writer.write_all(line.as_bytes()).await.expect("write request");
    }

    #[tokio::test]
    async fn serves_prompts_over_transport() {
        let (server, _staging) = testing::server(false);
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let running = tokio::spawn(async move {
            let (read, write) = tokio::io::split(server_io);
            let service = serve_server(server, (read, write)).await?;
            service.waiting().await?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
        });

        let (client_read, mut client_write) = tokio::io::split(client_io);
        let mut lines = BufReader::new(client_read).lines();

        send(
            &mut client_write,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": { "name": "tako-mcp-test", "version": "0.0.0" }
                }
            }),
        )
        .await;
        let initialized = lines.next_line().await.expect("read").expect("initialize reply");
        let initialized: Value = serde_json::from_str(&initialized).expect("json reply");
        assert!(initialized["result"]["capabilities"]["prompts"].is_object());

        send(
            &mut client_write,
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        )
        .await;
        send(
            &mut client_write,
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "prompts/get",
                "params": {
                    "name": "generate_search_tako_prompt",
                    "arguments": { "text": "GDP of Japan" }
                }
            }),
        )
        .await;
        let reply = lines.next_line().await.expect("read").expect("prompt reply");
        let reply: Value = serde_json::from_str(&reply).expect("json reply");

        assert_eq!(reply["id"], 2);
        let message = &reply["result"]["messages"][0];
        assert_eq!(message["role"], "user");
        let text = message["content"]["text"].as_str().expect("text content");
        assert!(text.contains("<UserInputText>\nGDP of Japan\n</UserInputText>"));

        running.abort();
    }
}
