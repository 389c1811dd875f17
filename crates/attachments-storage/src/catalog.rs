//! Media catalog: enumerates stored media from their JSON descriptors.
//!
//! A media item is catalogued iff a `<name>.json` descriptor entry exists for
//! it. Binary payloads without a descriptor are invisible. The walk is lazy
//! and recursive, and every call starts a fresh traversal.

use std::ffi::OsStr;
use std::fs::{self, DirEntry, ReadDir};
use std::path::Path;

use attachments_core::models::{EntryType, MediaRecord};
use attachments_core::sniff::DIRECTORY_MIME;
use attachments_core::{ContentSniffer, InferSniffer};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

/// File name suffix of media descriptors.
pub const DESCRIPTOR_SUFFIX: &str = ".json";

/// Identity of a media item: hex MD5 of its file name, location ignored.
pub fn media_id(name: &str) -> String {
    hex::encode(Md5::digest(name.as_bytes()))
}

/// Whether a directory entry is a media descriptor.
pub fn is_descriptor(entry: &DirEntry) -> bool {
    has_descriptor_suffix(&entry.file_name())
}

fn has_descriptor_suffix(name: &OsStr) -> bool {
    // Byte match: names that are not valid UTF-8 still count.
    name.as_encoded_bytes()
        .ends_with(DESCRIPTOR_SUFFIX.as_bytes())
}

/// Lazy depth-first walk yielding every entry below a directory.
///
/// Unreadable directories and entries are skipped, so the tree may change
/// underneath a running walk.
pub struct DirWalk {
    stack: Vec<ReadDir>,
}

impl DirWalk {
    /// An empty walk when `root` is not a readable directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut stack = Vec::new();
        if root.is_dir() {
            match fs::read_dir(root) {
                Ok(entries) => stack.push(entries),
                Err(e) => {
                    tracing::debug!(path = %root.display(), error = %e, "Skipping unreadable directory")
                }
            }
        }
        DirWalk { stack }
    }
}

impl Iterator for DirWalk {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        loop {
            let entries = self.stack.last_mut()?;
            let entry = match entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            // Symlinked directories are not followed, which keeps the walk finite.
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                match fs::read_dir(entry.path()) {
                    Ok(children) => self.stack.push(children),
                    Err(e) => tracing::debug!(
                        path = %entry.path().display(),
                        error = %e,
                        "Skipping unreadable directory"
                    ),
                }
            }

            return Some(entry);
        }
    }
}

/// Builds media records from descriptor entries.
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog<S = InferSniffer> {
    sniffer: S,
}

impl MediaCatalog<InferSniffer> {
    pub fn new() -> Self {
        Self {
            sniffer: InferSniffer,
        }
    }
}

impl<S: ContentSniffer> MediaCatalog<S> {
    pub fn with_sniffer(sniffer: S) -> Self {
        Self { sniffer }
    }

    /// Media below `dir`, in traversal order. Empty if `dir` is not a directory.
    pub fn list(self, dir: &Path) -> impl Iterator<Item = MediaRecord> {
        DirWalk::new(dir)
            .filter(is_descriptor)
            .filter_map(move |entry| self.describe(&entry))
    }

    /// Build the record for one descriptor entry; `None` if it vanished or cannot be read.
    pub fn describe(&self, entry: &DirEntry) -> Option<MediaRecord> {
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping media entry");
                return None;
            }
        };

        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping media entry without mtime");
                return None;
            }
        };
        let accessed = metadata.accessed().unwrap_or(modified);

        let entry_type = if metadata.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };
        let mime_type = match entry_type {
            EntryType::Directory => DIRECTORY_MIME.to_string(),
            EntryType::File => self.sniffer.detect(&path)?,
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        Some(MediaRecord {
            id: media_id(&name),
            path,
            name,
            size_bytes: metadata.len(),
            entry_type,
            mime_type,
            modified_at: DateTime::<Utc>::from(modified),
            accessed_at: DateTime::<Utc>::from(accessed),
        })
    }
}

/// List the media below `dir` with the default content sniffer.
pub fn list_media(dir: impl AsRef<Path>) -> impl Iterator<Item = MediaRecord> {
    MediaCatalog::new().list(dir.as_ref())
}

pub fn collect_media(dir: impl AsRef<Path>) -> Vec<MediaRecord> {
    list_media(dir).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn media_id_is_md5_of_name() {
        assert_eq!(media_id("a"), "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(media_id(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn only_descriptors_are_listed() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a.json"), br#"{"title":"a"}"#);
        write(&dir.path().join("a.png"), b"\x89PNG\r\n\x1a\n");
        write(&dir.path().join("sub/b.json"), br#"{"title":"b"}"#);

        let mut names: Vec<String> = list_media(dir.path()).map(|m| m.name).collect();
        names.sort();
        assert_eq!(names, vec!["a.json", "b.json"]);

        let nested = list_media(dir.path())
            .find(|m| m.name == "b.json")
            .unwrap();
        assert_eq!(nested.path, dir.path().join("sub/b.json"));
    }

    #[test]
    fn records_carry_filesystem_attributes() {
        let dir = tempdir().unwrap();
        let body = br#"{"title":"cat","mime_type":"image/png"}"#;
        write(&dir.path().join("cat.json"), body);

        let records = collect_media(dir.path());
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, media_id("cat.json"));
        assert_eq!(record.size_bytes, body.len() as u64);
        assert_eq!(record.entry_type, EntryType::File);
        // Detected from content, not from what the descriptor claims.
        assert_eq!(record.mime_type, "application/json");
    }

    #[test]
    fn same_name_in_different_directories_collides() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("members/1/photo.json"), b"{}");
        write(&dir.path().join("members/2/photo.json"), b"{}");

        let records = collect_media(dir.path());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, records[1].id);
        assert_ne!(records[0].path, records[1].path);
    }

    #[test]
    fn descriptor_named_directory_is_listed_and_descended() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("album.json")).unwrap();
        write(&dir.path().join("album.json/inner.json"), b"{}");

        let records = collect_media(dir.path());
        assert_eq!(records.len(), 2);

        let album = records.iter().find(|m| m.name == "album.json").unwrap();
        assert!(album.is_directory());
        assert_eq!(album.mime_type, DIRECTORY_MIME);
    }

    #[test]
    fn rescanning_yields_same_ids() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a.json"), b"{}");
        write(&dir.path().join("x/y/z.json"), b"{}");

        let first: HashSet<String> = list_media(dir.path()).map(|m| m.id).collect();
        let second: HashSet<String> = list_media(dir.path()).map(|m| m.id).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn missing_or_file_root_is_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(list_media(dir.path().join("missing")).count(), 0);

        let file = dir.path().join("plain.json");
        write(&file, b"{}");
        assert_eq!(list_media(&file).count(), 0);
    }

    #[test]
    fn walk_visits_nested_entries() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("one/two/three.txt"), b"x");

        let paths: HashSet<PathBuf> = DirWalk::new(dir.path()).map(|e| e.path()).collect();
        assert!(paths.contains(&dir.path().join("one")));
        assert!(paths.contains(&dir.path().join("one/two")));
        assert!(paths.contains(&dir.path().join("one/two/three.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_descriptor_names_are_listed() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let name = OsStr::from_bytes(b"caf\xE9.json");
        write(&dir.path().join(name), b"{}");
        write(&dir.path().join("ok.json"), b"{}");

        let records = collect_media(dir.path());
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|m| m.path == dir.path().join(name)));
    }

    #[cfg(unix)]
    #[test]
    fn vanished_descriptor_is_skipped() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("ok.json"), b"{}");
        std::os::unix::fs::symlink(dir.path().join("deleted.json"), dir.path().join("gone.json"))
            .unwrap();

        let records = collect_media(dir.path());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok.json");
    }

    struct FixedSniffer;

    impl ContentSniffer for FixedSniffer {
        fn detect(&self, _path: &Path) -> Option<String> {
            Some("image/webp".to_string())
        }
    }

    #[test]
    fn catalog_uses_injected_sniffer() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a.json"), b"{}");

        let catalog = MediaCatalog::with_sniffer(FixedSniffer);
        let records: Vec<MediaRecord> = catalog.list(dir.path()).collect();
        assert_eq!(records[0].mime_type, "image/webp");
    }
}
