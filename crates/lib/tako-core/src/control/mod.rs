use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::client::{ClientError, DataService, SourceIndex};
use crate::dataset::DatasetError;
use crate::upload::StagingError;

pub mod search;
pub mod upload;
pub mod visualize;

/// Indexes every knowledge search draws from.
pub const SEARCH_SOURCE_INDEXES: [SourceIndex; 2] = [SourceIndex::Tako, SourceIndex::Web];

/// Coarse classification of a [`HandlerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedInput,
    RemoteUnavailable,
    ValidationFailed,
    Staging,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    UnsupportedInput(String),
    #[error("{context}, {source}")]
    RemoteUnavailable {
        context: String,
        source: ClientError,
    },
    #[error("Invalid dataset format: {dataset}, {source}")]
    ValidationFailed {
        dataset: String,
        source: DatasetError,
    },
    #[error("{0}")]
    Staging(#[source] std::io::Error),
}

impl HandlerError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
            Self::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::Staging(_) => ErrorKind::Staging,
        }
    }

    pub(crate) fn remote(context: impl Into<String>, source: ClientError) -> Self {
        Self::RemoteUnavailable {
            context: context.into(),
            source,
        }
    }
}

impl From<StagingError> for HandlerError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::Io(io) => Self::Staging(io),
            other => Self::UnsupportedInput(other.to_string()),
        }
    }
}

/// Request context shared by every tool handler.
///
/// Holds the data-service client; clones share the same client.
#[derive(Clone)]
pub struct TakoControlPlane {
    service: Arc<dyn DataService>,
    staging_dir: Option<PathBuf>,
}

impl TakoControlPlane {
    #[must_use]
    pub fn new(service: impl DataService + 'static) -> Self {
        Self::from_arc(Arc::new(service))
    }

    #[must_use]
    pub fn from_arc(service: Arc<dyn DataService>) -> Self {
        Self {
            service,
            staging_dir: None,
        }
    }

    /// Stages uploads under `dir` instead of the system temp directory.
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }
}
