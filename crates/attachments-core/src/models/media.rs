use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of filesystem entry a catalogued item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// A catalogued media item, derived from its descriptor entry on disk.
///
/// Field names on the wire match what the media library front-end reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Hex digest of the file name; identical names share an id.
    pub id: String,
    pub path: PathBuf,
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub mime_type: String,
    #[serde(rename = "latest_modified_date")]
    pub modified_at: DateTime<Utc>,
    #[serde(rename = "latest_access_date")]
    pub accessed_at: DateTime<Utc>,
}

impl MediaRecord {
    pub fn is_directory(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
