//! Error types module
//!
//! All request-scoped failures (directory resolution, upload policy) and the
//! few infrastructure failures the core can hit are unified under `AppError`.
//! Domain rejections are data for the caller to surface, never faults.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// by whatever HTTP layer hosts the core.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNKNOWN_GROUP")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid directory: {0}")]
    InvalidDirectory(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidDirectory(_) => (
            400,
            "INVALID_DIRECTORY",
            false,
            Some("Select an existing directory and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnknownGroup(_) => (
            404,
            "UNKNOWN_GROUP",
            false,
            Some("Verify the group ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnknownUser(_) => (
            404,
            "UNKNOWN_USER",
            false,
            Some("Verify the member ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and upload again"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidFileType(_) => (
            415,
            "INVALID_FILE_TYPE",
            false,
            Some("Upload one of the allowed file types"),
            false,
            LogLevel::Debug,
        ),
        AppError::UploadFailed(_) => (
            400,
            "UPLOAD_FAILED",
            true,
            Some("Retry the upload"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Config(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidDirectory(ref msg)
            | AppError::UnknownGroup(ref msg)
            | AppError::UnknownUser(ref msg)
            | AppError::PayloadTooLarge(ref msg)
            | AppError::InvalidFileType(ref msg)
            | AppError::UploadFailed(ref msg)
            | AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Config(_) => "Storage is not configured".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
