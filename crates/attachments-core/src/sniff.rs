//! Content-based MIME type detection.
//!
//! Types are derived from the bytes on disk, never from the file name, so a
//! renamed executable is still reported as an executable.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// MIME type reported for directories.
pub const DIRECTORY_MIME: &str = "inode/directory";

/// Bytes read from the head of a file for detection.
const SNIFF_LIMIT: u64 = 64 * 1024;

/// Detects the MIME type of a file from its content.
pub trait ContentSniffer: Send + Sync {
    /// Returns `None` when the path cannot be read.
    fn detect(&self, path: &Path) -> Option<String>;
}

impl<T: ContentSniffer + ?Sized> ContentSniffer for &T {
    fn detect(&self, path: &Path) -> Option<String> {
        (**self).detect(path)
    }
}

/// Magic-byte sniffer backed by `infer`, with a text fallback for formats
/// that have no signature (plain text, JSON).
#[derive(Debug, Clone, Copy, Default)]
pub struct InferSniffer;

impl ContentSniffer for InferSniffer {
    fn detect(&self, path: &Path) -> Option<String> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cannot stat file for sniffing");
                return None;
            }
        };
        if metadata.is_dir() {
            return Some(DIRECTORY_MIME.to_string());
        }

        let mut head = Vec::new();
        let read = File::open(path).and_then(|file| file.take(SNIFF_LIMIT).read_to_end(&mut head));
        if let Err(e) = read {
            tracing::debug!(path = %path.display(), error = %e, "Cannot read file for sniffing");
            return None;
        }

        let complete = (head.len() as u64) < SNIFF_LIMIT;
        Some(sniff_bytes(&head, complete).to_string())
    }
}

/// Classify a buffer. `complete` tells whether the buffer holds the whole file.
pub fn sniff_bytes(head: &[u8], complete: bool) -> &'static str {
    if head.is_empty() {
        return "application/x-empty";
    }
    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }

    let is_text = match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte character cut by the read limit is still text.
        Err(e) => !complete && e.error_len().is_none(),
    };
    if !is_text {
        return "application/octet-stream";
    }

    if complete && serde_json::from_slice::<serde_json::Value>(head).is_ok() {
        "application/json"
    } else {
        "text/plain"
    }
}
