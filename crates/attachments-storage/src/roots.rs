//! Visibility roots: where public and private media live.

use std::path::PathBuf;

use attachments_core::models::{Visibility, VisibilityRoot};
use attachments_core::AttachmentsConfig;

/// Maps a visibility tag to its base storage location.
#[derive(Debug, Clone)]
pub struct MediaRoots {
    base_dir: PathBuf,
    base_url: String,
}

impl MediaRoots {
    /// # Arguments
    /// * `base_dir` - Upload base directory (e.g., "/var/www/uploads/bp-attachments")
    /// * `base_url` - URL the base directory is served from
    pub fn new(base_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_dir: base_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AttachmentsConfig) -> Self {
        Self::new(config.uploads_dir.clone(), config.uploads_url.clone())
    }

    /// Root for a raw visibility tag; anything but `"public"`/`"private"` is public.
    pub fn get_root(&self, visibility: &str) -> VisibilityRoot {
        self.root(Visibility::coerce(visibility))
    }

    pub fn root(&self, visibility: Visibility) -> VisibilityRoot {
        let subdir = visibility.segment();
        VisibilityRoot {
            base_dir: self.base_dir.clone(),
            base_url: self.base_url.clone(),
            path: self.base_dir.join(subdir.trim_start_matches('/')),
            url: format!("{}{}", self.base_url, subdir),
            subdir: subdir.to_string(),
        }
    }

    pub fn public_root(&self) -> VisibilityRoot {
        self.root(Visibility::Public)
    }

    pub fn private_root(&self) -> VisibilityRoot {
        self.root(Visibility::Private)
    }

    /// The upload base itself, with no visibility segment.
    pub fn base_root(&self) -> VisibilityRoot {
        VisibilityRoot {
            base_dir: self.base_dir.clone(),
            base_url: self.base_url.clone(),
            path: self.base_dir.clone(),
            url: self.base_url.clone(),
            subdir: String::new(),
        }
    }
}
