use attachments_core::models::{UploadCandidate, UploadErrorCode, UploadPolicy};
use attachments_core::{format_size, AppError, ContentSniffer, InferSniffer};

/// MIME types a file with the given extension may legitimately have.
///
/// Empty for extensions without a registered type; such files never pass the
/// type check.
pub fn mime_types_for_extension(extension: &str) -> &'static [&'static str] {
    match extension {
        // Images
        "jpg" | "jpeg" | "jpe" => &["image/jpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "bmp" => &["image/bmp"],
        "tif" | "tiff" => &["image/tiff"],
        "avif" => &["image/avif"],
        "heic" | "heif" => &["image/heif"],
        // Videos
        "mp4" => &["video/mp4"],
        "m4v" => &["video/x-m4v", "video/mp4"],
        "webm" => &["video/webm"],
        "mov" => &["video/quicktime"],
        "avi" => &["video/x-msvideo"],
        "mkv" => &["video/x-matroska"],
        // Ogg carries no audio/video distinction in its header.
        "ogv" => &["audio/ogg"],
        // Audio
        "mp3" => &["audio/mpeg"],
        "wav" => &["audio/x-wav", "audio/wav"],
        "ogg" | "oga" => &["audio/ogg", "audio/opus"],
        "m4a" => &["audio/m4a", "audio/mp4", "video/mp4"],
        "flac" => &["audio/x-flac", "audio/flac"],
        "aac" => &["audio/aac"],
        // Documents
        "pdf" => &["application/pdf"],
        // Compound files the sniff window cannot fully parse come back as x-ole-storage.
        "doc" => &["application/msword", "application/x-ole-storage"],
        "xls" => &["application/vnd.ms-excel", "application/x-ole-storage"],
        "ppt" => &["application/vnd.ms-powerpoint", "application/x-ole-storage"],
        "docx" => &[
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/zip",
        ],
        "xlsx" => &[
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "application/zip",
        ],
        "pptx" => &[
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            "application/zip",
        ],
        "odt" => &["application/vnd.oasis.opendocument.text", "application/zip"],
        // Text whose whole content happens to be valid JSON (`42`, `true`) sniffs as JSON.
        "txt" => &["text/plain", "application/json"],
        "csv" => &["text/csv", "text/plain", "application/json"],
        "json" => &["application/json", "text/plain"],
        // Archives
        "zip" => &["application/zip"],
        "gz" => &["application/gzip"],
        "tar" => &["application/x-tar"],
        _ => &[],
    }
}

/// Upload validator
///
/// Applies the size limit and the allowed-type list to an upload candidate.
/// Errors are written into the candidate; a candidate that arrives with an
/// error is returned untouched.
#[derive(Debug, Clone)]
pub struct UploadValidator<S = InferSniffer> {
    policy: UploadPolicy,
    sniffer: S,
}

impl UploadValidator<InferSniffer> {
    pub fn new(policy: UploadPolicy) -> Self {
        Self::with_sniffer(policy, InferSniffer)
    }
}

impl<S: ContentSniffer> UploadValidator<S> {
    pub fn with_sniffer(policy: UploadPolicy, sniffer: S) -> Self {
        let policy = UploadPolicy {
            max_size_bytes: policy.max_size_bytes,
            allowed_types: policy
                .allowed_types
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
        };
        Self { policy, sniffer }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Check size, then type. First error wins.
    pub fn validate(&self, mut candidate: UploadCandidate) -> UploadCandidate {
        if candidate.error.is_some() {
            return candidate;
        }

        if candidate.declared_size > self.policy.max_size_bytes {
            tracing::debug!(
                name = %candidate.declared_name,
                size_bytes = candidate.declared_size,
                max_bytes = self.policy.max_size_bytes,
                "Upload rejected: too large"
            );
            candidate.error = Some(UploadErrorCode::FileTooLarge);
        } else if !self.is_allowed_type(&candidate) {
            tracing::debug!(
                name = %candidate.declared_name,
                "Upload rejected: type not allowed"
            );
            candidate.error = Some(UploadErrorCode::InvalidFileType);
        }

        candidate
    }

    /// Validate and convert a rejection into an `AppError`.
    pub fn check(&self, candidate: UploadCandidate) -> Result<UploadCandidate, AppError> {
        let candidate = self.validate(candidate);
        match candidate.error {
            None => Ok(candidate),
            Some(code) => {
                let message = self.message_for(code);
                Err(match code {
                    UploadErrorCode::FileTooLarge => AppError::PayloadTooLarge(message),
                    UploadErrorCode::InvalidFileType => AppError::InvalidFileType(message),
                    UploadErrorCode::Transport(_) => AppError::UploadFailed(message),
                })
            }
        }
    }

    /// Client-facing message for an error code.
    pub fn message_for(&self, code: UploadErrorCode) -> String {
        match code {
            UploadErrorCode::FileTooLarge => format!(
                "That media is too big. Please upload one smaller than {}",
                format_size(self.policy.max_size_bytes)
            ),
            UploadErrorCode::InvalidFileType => {
                let noun = if self.policy.allowed_types.len() == 1 {
                    "this file type"
                } else {
                    "these file types"
                };
                format!("Please upload only {}: {}.", noun, self.media_types())
            }
            UploadErrorCode::Transport(1) | UploadErrorCode::Transport(2) => format!(
                "The uploaded file exceeds the maximum allowed file size of {}",
                format_size(self.policy.max_size_bytes)
            ),
            UploadErrorCode::Transport(3) => {
                "The uploaded file was only partially uploaded.".to_string()
            }
            UploadErrorCode::Transport(4) => "No file was uploaded.".to_string(),
            UploadErrorCode::Transport(6) => "Missing a temporary folder.".to_string(),
            UploadErrorCode::Transport(7) => "Failed to write file to disk.".to_string(),
            UploadErrorCode::Transport(8) => "File upload stopped by extension.".to_string(),
            UploadErrorCode::Transport(other) => {
                format!("The upload failed (error code {}).", other)
            }
        }
    }

    /// Allowed types for display: upper-cased, comma separated.
    pub fn media_types(&self) -> String {
        self.policy
            .allowed_types
            .iter()
            .map(|t| t.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn is_allowed_type(&self, candidate: &UploadCandidate) -> bool {
        let Some(extension) = candidate.extension() else {
            return false;
        };
        if !self.policy.allowed_types.contains(&extension) {
            return false;
        }

        let detected = match &candidate.detected_mime_type {
            Some(mime) => Some(mime.to_lowercase()),
            None => self.sniffer.detect(&candidate.temp_path),
        };
        let Some(detected) = detected else {
            tracing::debug!(path = %candidate.temp_path.display(), "Could not detect upload type");
            return false;
        };

        let expected = mime_types_for_extension(&extension);
        let matches = expected.contains(&detected.as_str());
        if !matches {
            tracing::debug!(
                extension = %extension,
                detected = %detected,
                expected = %expected.join(", "),
                "Detected type does not match extension"
            );
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const PNG_HEADER: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    struct FixedSniffer(Option<&'static str>);

    impl ContentSniffer for FixedSniffer {
        fn detect(&self, _path: &Path) -> Option<String> {
            self.0.map(String::from)
        }
    }

    fn policy() -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: 1024 * 1024, // 1MB
            allowed_types: vec!["jpg".to_string(), "png".to_string()],
        }
    }

    fn test_validator(detected: Option<&'static str>) -> UploadValidator<FixedSniffer> {
        UploadValidator::with_sniffer(policy(), FixedSniffer(detected))
    }

    #[test]
    fn test_size_at_limit_passes() {
        let validator = test_validator(Some("image/png"));
        let candidate = UploadCandidate::new("/tmp/up", "cat.png", 1024 * 1024);
        assert_eq!(validator.validate(candidate).error, None);
    }

    #[test]
    fn test_size_over_limit_fails_regardless_of_type() {
        let validator = test_validator(Some("application/x-msdownload"));
        let candidate = UploadCandidate::new("/tmp/up", "evil.exe", 1024 * 1024 + 1);
        assert_eq!(
            validator.validate(candidate).error,
            Some(UploadErrorCode::FileTooLarge)
        );
    }

    #[test]
    fn test_existing_error_passes_through() {
        let validator = test_validator(Some("image/png"));
        let mut candidate = UploadCandidate::new("/tmp/up", "cat.png", 10 * 1024 * 1024);
        candidate.error = Some(UploadErrorCode::Transport(3));

        let validated = validator.validate(candidate.clone());
        assert_eq!(validated, candidate);
    }

    #[test]
    fn test_extension_not_allowed() {
        let validator = test_validator(Some("application/pdf"));
        let candidate = UploadCandidate::new("/tmp/up", "doc.pdf", 10);
        assert_eq!(
            validator.validate(candidate).error,
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_spoofed_content_fails() {
        let validator = test_validator(Some("text/plain"));
        let candidate = UploadCandidate::new("/tmp/up", "cat.png", 10);
        assert_eq!(
            validator.validate(candidate).error,
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_undetectable_content_fails() {
        let validator = test_validator(None);
        let candidate = UploadCandidate::new("/tmp/up", "cat.png", 10);
        assert_eq!(
            validator.validate(candidate).error,
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_missing_extension_fails() {
        let validator = test_validator(Some("image/png"));
        let candidate = UploadCandidate::new("/tmp/up", "cat", 10);
        assert_eq!(
            validator.validate(candidate).error,
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_declared_detection_is_used_before_sniffing() {
        let validator = test_validator(None);
        let mut candidate = UploadCandidate::new("/tmp/up", "Cat.JPG", 10);
        candidate.detected_mime_type = Some("image/jpeg".to_string());
        assert_eq!(validator.validate(candidate).error, None);
    }

    #[test]
    fn test_sniffs_real_file_content() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("phpA1B2");
        fs::write(&png, PNG_HEADER).unwrap();
        let text = dir.path().join("phpC3D4");
        fs::write(&text, b"not an image").unwrap();

        let validator = UploadValidator::new(policy());
        assert!(validator
            .validate(UploadCandidate::new(&png, "cat.png", 16))
            .is_accepted());
        assert_eq!(
            validator
                .validate(UploadCandidate::new(&text, "cat.png", 12))
                .error,
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_messages() {
        let validator = test_validator(None);
        assert_eq!(
            validator.message_for(UploadErrorCode::FileTooLarge),
            "That media is too big. Please upload one smaller than 1 MB"
        );
        assert_eq!(
            validator.message_for(UploadErrorCode::InvalidFileType),
            "Please upload only these file types: JPG, PNG."
        );
        assert_eq!(
            validator.message_for(UploadErrorCode::Transport(4)),
            "No file was uploaded."
        );

        let single = UploadValidator::with_sniffer(
            UploadPolicy {
                max_size_bytes: 10,
                allowed_types: vec!["PDF".to_string()],
            },
            FixedSniffer(None),
        );
        assert_eq!(
            single.message_for(UploadErrorCode::InvalidFileType),
            "Please upload only this file type: PDF."
        );
    }

    #[test]
    fn test_check_maps_to_app_error() {
        let validator = test_validator(Some("image/png"));
        let err = validator
            .check(UploadCandidate::new("/tmp/up", "cat.png", 2 * 1024 * 1024))
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let ok = validator.check(UploadCandidate::new("/tmp/up", "cat.png", 5));
        assert!(ok.is_ok());
    }

    fn sniffed(allowed: &str, name: &str, content: &[u8]) -> Option<UploadErrorCode> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phpUpload");
        fs::write(&path, content).unwrap();
        let validator = UploadValidator::new(UploadPolicy {
            max_size_bytes: 1024 * 1024,
            allowed_types: vec![allowed.to_string()],
        });
        validator
            .validate(UploadCandidate::new(&path, name, content.len() as u64))
            .error
    }

    #[test]
    fn test_text_that_parses_as_json_is_still_text() {
        assert_eq!(sniffed("txt", "notes.txt", b"42"), None);
        assert_eq!(sniffed("txt", "notes.txt", b"true"), None);
        assert_eq!(sniffed("txt", "notes.txt", br#"{"a":1}"#), None);
        assert_eq!(sniffed("csv", "scores.csv", b"1"), None);
        assert_eq!(sniffed("txt", "notes.txt", b"plain words"), None);
    }

    #[test]
    fn test_heic_image_is_accepted() {
        let mut heic = vec![0x00, 0x00, 0x00, 0x18];
        heic.extend_from_slice(b"ftypheic");
        heic.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        heic.extend_from_slice(b"mif1heic");
        assert_eq!(sniffed("heic", "IMG_0001.HEIC", &heic), None);
    }

    #[test]
    fn test_ogg_video_is_accepted() {
        let mut ogg = b"OggS".to_vec();
        ogg.extend_from_slice(&[0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(sniffed("ogv", "clip.ogv", &ogg), None);
        assert_eq!(sniffed("ogg", "song.ogg", &ogg), None);
    }

    #[test]
    fn test_legacy_office_documents_are_accepted() {
        let mut ole = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        ole.resize(512, 0);
        assert_eq!(sniffed("xls", "budget.xls", &ole), None);
        assert_eq!(sniffed("ppt", "deck.ppt", &ole), None);
        assert_eq!(sniffed("doc", "letter.doc", &ole), None);
        assert_eq!(
            sniffed("xls", "budget.xls", b"not a spreadsheet"),
            Some(UploadErrorCode::InvalidFileType)
        );
    }

    #[test]
    fn test_office_types_match_detected_names() {
        assert!(mime_types_for_extension("xls").contains(&"application/vnd.ms-excel"));
        assert!(mime_types_for_extension("ppt").contains(&"application/vnd.ms-powerpoint"));
        assert!(mime_types_for_extension("doc").contains(&"application/msword"));
        assert!(mime_types_for_extension("m4v").contains(&"video/x-m4v"));
    }

    #[test]
    fn test_unknown_extension_has_no_types() {
        assert!(mime_types_for_extension("xyz").is_empty());
        assert_eq!(mime_types_for_extension("jpeg"), &["image/jpeg"]);
    }
}
