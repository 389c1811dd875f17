//! Attachments Storage Library
//!
//! Locates and enumerates media on the local filesystem.
//!
//! # Layout
//!
//! Everything lives below one upload base directory:
//!
//! - `public/members/{id}/…`, `public/groups/{id}/…`
//! - `private/members/{id}/…`, `private/groups/{id}/…`
//!
//! Directories are provisioned once at install time. Nothing in this crate
//! creates them; the resolver only checks and composes paths, and the
//! catalog only reads.

pub mod catalog;
pub mod owners;
pub mod resolver;
pub mod roots;
pub mod traits;

// Re-export commonly used types
pub use catalog::{collect_media, is_descriptor, list_media, media_id, DirWalk, MediaCatalog};
pub use owners::StaticOwnerDirectory;
pub use resolver::StoragePathResolver;
pub use roots::MediaRoots;
pub use traits::{OwnerDirectory, ResolveError};
