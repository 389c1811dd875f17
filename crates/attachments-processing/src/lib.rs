//! Attachments Processing Library
//!
//! Upload policy checks applied before an upload is moved into its resolved
//! directory.

pub mod validator;

pub use validator::{mime_types_for_extension, UploadValidator};
