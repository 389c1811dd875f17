//! Configuration module
//!
//! Storage location and upload policy for the attachments core, read from the
//! environment (optionally seeded by a `.env` file).

use std::env;
use std::path::PathBuf;

use validator::Validate;

use crate::error::AppError;
use crate::models::UploadPolicy;

const DEFAULT_UPLOADS_DIR: &str = "./uploads/bp-attachments";
const DEFAULT_UPLOADS_URL: &str = "http://localhost:8080/uploads/bp-attachments";
const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 50;
const DEFAULT_ALLOWED_TYPES: &str = "jpg,jpeg,png,gif,webp,pdf,mp4,mp3,txt";

/// Attachments configuration
#[derive(Clone, Debug, Validate)]
pub struct AttachmentsConfig {
    /// Upload base directory; `public/` and `private/` live directly below it.
    pub uploads_dir: PathBuf,
    #[validate(url(message = "ATTACHMENTS_UPLOADS_URL must be a valid URL"))]
    pub uploads_url: String,
    #[validate(range(min = 1, message = "ATTACHMENTS_MAX_UPLOAD_SIZE_MB must be at least 1"))]
    pub max_upload_size_bytes: u64,
    #[validate(length(min = 1, message = "ATTACHMENTS_ALLOWED_TYPES must not be empty"))]
    pub allowed_types: Vec<String>,
    pub environment: String,
}

impl AttachmentsConfig {
    /// Build a configuration with the default policy for the given location.
    pub fn new(uploads_dir: impl Into<PathBuf>, uploads_url: impl Into<String>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            uploads_url: uploads_url.into(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            allowed_types: parse_list(DEFAULT_ALLOWED_TYPES),
            environment: "development".to_string(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let max_upload_size_mb = env::var("ATTACHMENTS_MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let config = AttachmentsConfig {
            uploads_dir: env::var("ATTACHMENTS_UPLOADS_DIR")
                .unwrap_or_else(|_| DEFAULT_UPLOADS_DIR.to_string())
                .into(),
            uploads_url: env::var("ATTACHMENTS_UPLOADS_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOADS_URL.to_string()),
            max_upload_size_bytes: megabytes_to_bytes(max_upload_size_mb)?,
            allowed_types: parse_list(
                &env::var("ATTACHMENTS_ALLOWED_TYPES")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_TYPES.to_string()),
            ),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        tracing::debug!(
            uploads_dir = %config.uploads_dir.display(),
            max_upload_size_bytes = config.max_upload_size_bytes,
            "Loaded attachments configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        Validate::validate(self).map_err(|e| AppError::Config(e.to_string()))?;

        if !self.uploads_url.starts_with("http://") && !self.uploads_url.starts_with("https://") {
            return Err(AppError::Config(
                "ATTACHMENTS_UPLOADS_URL must use http or https".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: self.max_upload_size_bytes,
            allowed_types: self.allowed_types.clone(),
        }
    }
}

fn megabytes_to_bytes(megabytes: u64) -> Result<u64, AppError> {
    megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
        AppError::Config(format!(
            "ATTACHMENTS_MAX_UPLOAD_SIZE_MB is too large: {} MB does not fit in a byte count",
            megabytes
        ))
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
