use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{ClientError, DataService, SourceIndex, VisualizeTarget};

pub const DEFAULT_BASE_URL: &str = "https://trytako.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const API_KEY_HEADER: &str = "X-API-Key";
const KNOWLEDGE_SEARCH_PATH: &str = "/api/v1/knowledge_search";
const UPLOAD_PATH: &str = "/api/v1/beta/files";
const VISUALIZE_PATH: &str = "/api/v1/beta/visualize";

/// Connection settings for [`TakoClient`].
#[derive(Clone)]
pub struct TakoClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl TakoClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for TakoClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakoClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the Tako API.
#[derive(Clone)]
pub struct TakoClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TakoClient {
    /// Builds a client from the given configuration.
    ///
    /// # Errors
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: TakoClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(status = status.as_u16(), error = %err, "failed to read error body");
                    String::new()
                }
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "id")]
    file_id: String,
}

#[async_trait]
impl DataService for TakoClient {
    async fn search(
        &self,
        text: &str,
        source_indexes: &[SourceIndex],
    ) -> Result<Value, ClientError> {
        debug!(?source_indexes, "knowledge search");
        let body = json!({
            "inputs": { "text": text },
            "source_indexes": source_indexes,
        });
        self.send_json(self.http.post(self.endpoint(KNOWLEDGE_SEARCH_PATH)).json(&body))
            .await
    }

    async fn upload_file(&self, path: &Path) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path.file_name().map_or_else(
            || "upload".to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        debug!(file_name = %file_name, size = bytes.len(), "uploading file");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let value = self
            .send_json(self.http.post(self.endpoint(UPLOAD_PATH)).multipart(form))
            .await?;
        let uploaded: UploadResponse =
            serde_json::from_value(value).map_err(|err| ClientError::Decode(err.to_string()))?;
        Ok(uploaded.file_id)
    }

    async fn visualize(&self, target: &VisualizeTarget) -> Result<Value, ClientError> {
        let body = match target {
            VisualizeTarget::File(file_id) => json!({ "file_id": file_id }),
            VisualizeTarget::Dataset(dataset) => json!({ "tako_formatted_dataset": dataset }),
        };
        self.send_json(self.http.post(self.endpoint(VISUALIZE_PATH)).json(&body))
            .await
    }
}
