//! Collaborator seams for directory resolution
//!
//! Owner lookup is provided by the host platform; this module defines the
//! trait the resolver consumes and the errors resolution can produce.

use std::sync::Arc;

use attachments_core::models::{GroupRecord, UserRecord};
use attachments_core::AppError;
use thiserror::Error;

/// Directory resolution errors. The display strings are the client-facing
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Please select an existing directory.")]
    InvalidDirectory { sub_path: String },

    #[error("Unknown group. Please try again")]
    UnknownGroup { group_id: u64 },

    #[error("Unknown user. Please try again")]
    UnknownUser { user_id: u64 },
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err {
            ResolveError::InvalidDirectory { .. } => AppError::InvalidDirectory(message),
            ResolveError::UnknownGroup { .. } => AppError::UnknownGroup(message),
            ResolveError::UnknownUser { .. } => AppError::UnknownUser(message),
        }
    }
}

/// Owner lookup provided by the host platform.
///
/// Implementations answer from whatever holds members and groups; the
/// resolver only compares ids and reads the group status.
pub trait OwnerDirectory: Send + Sync {
    /// Look up a group. A record whose id differs from `id` counts as not found.
    fn lookup_group(&self, id: u64) -> Option<GroupRecord>;

    /// Look up a member.
    fn lookup_user(&self, id: u64) -> Option<UserRecord>;

    /// Id of the authenticated caller, `0` when anonymous.
    fn current_user_id(&self) -> u64;
}

impl<T: OwnerDirectory + ?Sized> OwnerDirectory for &T {
    fn lookup_group(&self, id: u64) -> Option<GroupRecord> {
        (**self).lookup_group(id)
    }

    fn lookup_user(&self, id: u64) -> Option<UserRecord> {
        (**self).lookup_user(id)
    }

    fn current_user_id(&self) -> u64 {
        (**self).current_user_id()
    }
}

impl<T: OwnerDirectory + ?Sized> OwnerDirectory for Arc<T> {
    fn lookup_group(&self, id: u64) -> Option<GroupRecord> {
        (**self).lookup_group(id)
    }

    fn lookup_user(&self, id: u64) -> Option<UserRecord> {
        (**self).lookup_user(id)
    }

    fn current_user_id(&self) -> u64 {
        (**self).current_user_id()
    }
}
