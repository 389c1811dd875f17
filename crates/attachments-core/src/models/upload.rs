use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Upload error codes. Transport codes come from the upload-handling layer
/// (1-8), policy codes from the validator (11, 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(into = "u16", from = "u16")]
pub enum UploadErrorCode {
    #[error("upload transport error {0}")]
    Transport(u16),
    #[error("file too large")]
    FileTooLarge,
    #[error("invalid file type")]
    InvalidFileType,
}

impl UploadErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            UploadErrorCode::Transport(code) => *code,
            UploadErrorCode::FileTooLarge => 11,
            UploadErrorCode::InvalidFileType => 12,
        }
    }
}

impl From<UploadErrorCode> for u16 {
    fn from(code: UploadErrorCode) -> Self {
        code.code()
    }
}

impl From<u16> for UploadErrorCode {
    fn from(code: u16) -> Self {
        match code {
            11 => UploadErrorCode::FileTooLarge,
            12 => UploadErrorCode::InvalidFileType,
            other => UploadErrorCode::Transport(other),
        }
    }
}

/// A parsed but not yet accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCandidate {
    /// Where the upload layer parked the bytes.
    pub temp_path: PathBuf,
    /// Client-supplied file name.
    pub declared_name: String,
    pub declared_size: u64,
    /// Type already sniffed by the upload layer, if any.
    pub detected_mime_type: Option<String>,
    pub error: Option<UploadErrorCode>,
}

impl UploadCandidate {
    pub fn new(temp_path: impl Into<PathBuf>, declared_name: impl Into<String>, declared_size: u64) -> Self {
        Self {
            temp_path: temp_path.into(),
            declared_name: declared_name.into(),
            declared_size,
            detected_mime_type: None,
            error: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }

    /// Lowercased extension of the declared name.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.declared_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// Size and type policy applied to uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    /// Allowed file extensions, lowercase (`jpg`, `pdf`, ...).
    pub allowed_types: Vec<String>,
}
