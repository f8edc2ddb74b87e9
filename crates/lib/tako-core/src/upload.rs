//! Upload staging.
//!
//! The data service uploads from a filesystem path, so inline content is
//! decoded and written to a uniquely named temp file first. A [`StagedUpload`]
//! removes its file when released or dropped.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

pub const SUPPORTED_ENCODING: &str = "base64";

const TEMP_PREFIX: &str = "temp_";
const FALLBACK_FILENAME: &str = "upload";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Unsupported encoding: {0}, supported encoding is base64")]
    UnsupportedEncoding(String),
    #[error("content is not valid base64: {0}")]
    InvalidContent(#[from] base64::DecodeError),
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodings accepted for inline upload content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
}

impl FromStr for ContentEncoding {
    type Err = StagingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SUPPORTED_ENCODING => Ok(Self::Base64),
            other => Err(StagingError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl ContentEncoding {
    /// Decodes `content` into raw bytes. ASCII whitespace is ignored.
    ///
    /// # Errors
    /// Returns `StagingError::InvalidContent` if the content is malformed.
    pub fn decode(self, content: &str) -> Result<Vec<u8>, StagingError> {
        match self {
            Self::Base64 => {
                let compact: String = content
                    .chars()
                    .filter(|ch| !ch.is_ascii_whitespace())
                    .collect();
                Ok(STANDARD.decode(compact)?)
            }
        }
    }
}

/// Decoded upload content held in a temp file for the length of one call.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Writes `bytes` to a new temp file under the system temp directory.
    ///
    /// # Errors
    /// Returns `StagingError::Io` if the file cannot be created or written.
    pub fn stage(filename: &str, bytes: &[u8]) -> Result<Self, StagingError> {
        Self::stage_in(&std::env::temp_dir(), filename, bytes)
    }

    /// Writes `bytes` to a new temp file under `dir`.
    ///
    /// The file name is `temp_<random>_<filename>`; path separators in
    /// `filename` are replaced so the file always lands directly in `dir`.
    ///
    /// # Errors
    /// Returns `StagingError::Io` if the file cannot be created or written.
    pub fn stage_in(dir: &Path, filename: &str, bytes: &[u8]) -> Result<Self, StagingError> {
        let suffix = format!("_{}", sanitize_filename(filename));
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the temp file now, logging instead of failing if removal errors.
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(err) = self.file.close() {
            warn!(path = %path.display(), error = %err, "failed to remove staged upload");
        }
    }
}

fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    if cleaned.trim().is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}
