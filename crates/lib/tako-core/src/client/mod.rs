//! Data-service client seam.
//!
//! The control plane only talks to the remote service through [`DataService`],
//! so tests can swap in a fake while the daemon uses [`TakoClient`].

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::dataset::TakoDataFormatDataset;

pub mod http;

pub use http::{TakoClient, TakoClientConfig};

/// Knowledge indexes a search can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceIndex {
    Tako,
    Web,
}

/// What a visualization request should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualizeTarget {
    /// A file previously uploaded with [`DataService::upload_file`].
    File(String),
    /// An inline dataset that already passed local validation.
    Dataset(TakoDataFormatDataset),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("data service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected data service response: {0}")]
    Decode(String),
}

/// Operations exposed by the remote Tako data service.
///
/// Responses are passed through untouched; no schema is owned on this side.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Runs a knowledge search against the given source indexes.
    async fn search(
        &self,
        text: &str,
        source_indexes: &[SourceIndex],
    ) -> Result<Value, ClientError>;

    /// Uploads the file at `path` and returns the service-assigned file id.
    async fn upload_file(&self, path: &Path) -> Result<String, ClientError>;

    /// Requests a visualization for an uploaded file or an inline dataset.
    async fn visualize(&self, target: &VisualizeTarget) -> Result<Value, ClientError>;
}
