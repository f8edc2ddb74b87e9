use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::TakoMcp;

/// Returned by `search` in place of any data-service failure.
pub const NO_RESULT_SENTINEL: &str = "no result found";

/// Parameters for a knowledge search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Natural-language query, ideally about a single metric or entity.
    pub text: String,
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl TakoMcp {
    #[tool(description = "Search Tako for any knowledge you want and get data and visualizations.")]
    pub(crate) async fn search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.control().search(&params.text).await {
            Ok(response) => Ok(CallToolResult::success(vec![Content::json(response)?])),
            Err(err) => {
                error!(kind = ?err.kind(), error = %err, "search failed");
                Ok(CallToolResult::success(vec![Content::text(NO_RESULT_SENTINEL)]))
            }
        }
    }
}
