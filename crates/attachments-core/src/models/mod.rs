//! Data models for the attachments core
//!
//! Value objects exchanged between the resolver, the validator and the
//! catalog. None of them is persisted; the filesystem is the source of truth.

mod directory;
mod media;
mod owner;
mod upload;
mod visibility;

pub use directory::*;
pub use media::*;
pub use owner::*;
pub use upload::*;
pub use visibility::*;
