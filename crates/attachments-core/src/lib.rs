//! Attachments Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! content sniffing shared by the storage, processing and CLI crates.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod sniff;

// Re-export commonly used types
pub use config::AttachmentsConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::format_size;
pub use sniff::{ContentSniffer, InferSniffer};
