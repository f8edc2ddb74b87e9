use tracing::info;

use super::{HandlerError, TakoControlPlane};
use crate::upload::{ContentEncoding, StagedUpload};

impl TakoControlPlane {
    /// Decodes inline content, stages it to a temp file, and uploads it.
    ///
    /// The encoding is checked before anything is decoded or written. The
    /// staged file is removed before this returns, whatever the outcome.
    ///
    /// # Errors
    /// Returns `HandlerError::UnsupportedInput` for an unknown encoding or
    /// undecodable content, `HandlerError::Staging` if the temp file cannot be
    /// written, and `HandlerError::RemoteUnavailable` if the upload fails.
    pub async fn upload_file(
        &self,
        filename: &str,
        content: &str,
        encoding: &str,
    ) -> Result<String, HandlerError> {
        let encoding: ContentEncoding = encoding.parse()?;
        let bytes = encoding.decode(content)?;

        let staged = match &self.staging_dir {
            Some(dir) => StagedUpload::stage_in(dir, filename, &bytes)?,
            None => StagedUpload::stage(filename, &bytes)?,
        };
        let staged_path = staged.path().display().to_string();

        let result = self.service.upload_file(staged.path()).await;
        staged.release();

        let file_id = result.map_err(|err| {
            HandlerError::remote(format!("Failed to upload file: {staged_path}"), err)
        })?;
        info!(filename = %filename, file_id = %file_id, "uploaded file");
        Ok(file_id)
    }
}
