use serde_json::Value;
use tracing::debug;

use super::{HandlerError, SEARCH_SOURCE_INDEXES, TakoControlPlane};

impl TakoControlPlane {
    /// Searches the Tako and web indexes for `text`.
    ///
    /// # Errors
    /// Returns `HandlerError::RemoteUnavailable` if the data service call fails.
    pub async fn search(&self, text: &str) -> Result<Value, HandlerError> {
        debug!(text = %text, "searching tako");
        self.service
            .search(text, &SEARCH_SOURCE_INDEXES)
            .await
            .map_err(|err| HandlerError::remote(format!("Failed to search Tako: {text}"), err))
    }
}
