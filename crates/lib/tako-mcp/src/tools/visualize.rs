use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tako_core::upload::SUPPORTED_ENCODING;

use crate::{TakoMcp, helpers};

/// Parameters for uploading inline file content.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UploadFileParams {
    /// Original file name, e.g. `sales.csv`.
    pub filename: String,
    /// File content encoded as described by `encoding`.
    pub content: String,
    /// Content encoding. Only `base64` is supported.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    SUPPORTED_ENCODING.to_string()
}

/// Parameters for visualizing an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VisualizeFileParams {
    /// Identifier returned by `upload_file`.
    pub file_id: String,
}

/// Parameters for visualizing an inline dataset.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VisualizeDatasetParams {
    /// Dataset in Tako Data Format: `title`, `variables`, and `rows`.
    pub dataset: Map<String, Value>,
}

#[tool_router(router = tool_router_visualize, vis = "pub")]
impl TakoMcp {
    #[tool(description = "Upload a file in base64 format to Tako to visualize. Returns the file_id of the uploaded file to call visualize_file with.")]
    pub(crate) async fn upload_file(
        &self,
        Parameters(params): Parameters<UploadFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self
            .control()
            .upload_file(&params.filename, &params.content, &params.encoding)
            .await
        {
            Ok(file_id) => Ok(CallToolResult::success(vec![Content::text(file_id)])),
            Err(err) => helpers::tool_failure("upload_file", &err),
        }
    }

    #[tool(description = "Visualize a file in Tako using the file_id returned from upload_file. Returns the visualization.")]
    pub(crate) async fn visualize_file(
        &self,
        Parameters(params): Parameters<VisualizeFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.control().visualize_file(&params.file_id).await {
            Ok(response) => Ok(CallToolResult::success(vec![Content::json(response)?])),
            Err(err) => helpers::tool_failure("visualize_file", &err),
        }
    }

    #[tool(description = "Given a structured dataset in Tako Data Format, return a visualization. Invalid datasets are rejected with an explanation so they can be fixed and resent.")]
    pub(crate) async fn visualize_dataset(
        &self,
        Parameters(params): Parameters<VisualizeDatasetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.control().visualize_dataset(params.dataset).await {
            Ok(response) => Ok(CallToolResult::success(vec![Content::json(response)?])),
            Err(err) => helpers::tool_failure("visualize_dataset", &err),
        }
    }
}
