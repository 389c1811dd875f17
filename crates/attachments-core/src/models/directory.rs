use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Base storage location for one visibility tag (or for the bare upload base).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRoot {
    /// Upload base directory shared by every root.
    pub base_dir: PathBuf,
    pub base_url: String,
    /// Directory of this root, `base_dir` + `subdir`.
    pub path: PathBuf,
    pub url: String,
    /// Segment below the base, e.g. `/public`; empty for the bare base.
    pub subdir: String,
}

impl VisibilityRoot {
    /// Append a `/`-prefixed segment to this root, producing a successful resolution.
    pub fn join(&self, segment: &str) -> ResolvedDirectory {
        ResolvedDirectory {
            path: self.path.join(segment.trim_start_matches('/')),
            url: format!("{}{}", self.url, segment),
            subdir: format!("{}{}", self.subdir, segment),
            error: None,
        }
    }
}

/// Directory an upload is written to, or the reason none could be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDirectory {
    pub path: PathBuf,
    pub url: String,
    pub subdir: String,
    pub error: Option<String>,
}

impl ResolvedDirectory {
    /// A failed resolution keeps the fallback location but carries no sub-path.
    pub fn failed(fallback: &VisibilityRoot, message: impl Into<String>) -> Self {
        Self {
            path: fallback.path.clone(),
            url: fallback.url.clone(),
            subdir: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
