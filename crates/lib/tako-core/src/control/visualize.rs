use serde_json::{Map, Value};

use super::{HandlerError, TakoControlPlane};
use crate::client::VisualizeTarget;
use crate::dataset::TakoDataFormatDataset;

impl TakoControlPlane {
    /// Visualizes a previously uploaded file.
    ///
    /// # Errors
    /// Returns `HandlerError::RemoteUnavailable` if the data service call fails.
    pub async fn visualize_file(&self, file_id: &str) -> Result<Value, HandlerError> {
        self.service
            .visualize(&VisualizeTarget::File(file_id.to_string()))
            .await
            .map_err(|err| {
                HandlerError::remote(format!("Failed to visualize file: {file_id}"), err)
            })
    }

    /// Validates `dataset` against the Tako Data Format, then visualizes it.
    ///
    /// Invalid datasets never reach the data service.
    ///
    /// # Errors
    /// Returns `HandlerError::ValidationFailed` with the diagnostic when the
    /// dataset is rejected, or `HandlerError::RemoteUnavailable` if the data
    /// service call fails.
    pub async fn visualize_dataset(
        &self,
        dataset: Map<String, Value>,
    ) -> Result<Value, HandlerError> {
        let rendered = serde_json::to_string(&dataset).unwrap_or_default();
        let validated = TakoDataFormatDataset::from_map(dataset).map_err(|source| {
            HandlerError::ValidationFailed {
                dataset: rendered.clone(),
                source,
            }
        })?;

        self.service
            .visualize(&VisualizeTarget::Dataset(validated))
            .await
            .map_err(|err| {
                HandlerError::remote(format!("Failed to generate visualization: {rendered}"), err)
            })
    }
}
