//! Storage path resolution for incoming uploads.
//!
//! An upload either names an existing sub-directory of the upload base
//! (`parent_dir`) or is placed by ownership: `/members/{id}` or
//! `/groups/{id}` under the public or private root. Resolution only reads
//! the filesystem; provisioning happens at install time.

use std::path::{Component, Path};

use attachments_core::models::{
    Owner, OwnerContext, ResolvedDirectory, UploadRequestParams, Visibility,
};

use crate::roots::MediaRoots;
use crate::traits::{OwnerDirectory, ResolveError};

/// Resolves the directory an upload is written to.
#[derive(Debug, Clone)]
pub struct StoragePathResolver<D> {
    roots: MediaRoots,
    owners: D,
}

impl<D: OwnerDirectory> StoragePathResolver<D> {
    pub fn new(roots: MediaRoots, owners: D) -> Self {
        Self { roots, owners }
    }

    pub fn roots(&self) -> &MediaRoots {
        &self.roots
    }

    /// Resolve with failures folded into `ResolvedDirectory::error`.
    pub fn resolve(&self, ctx: &OwnerContext) -> ResolvedDirectory {
        match self.try_resolve(ctx) {
            Ok(dir) => {
                tracing::debug!(
                    owner = ?ctx.owner,
                    path = %dir.path.display(),
                    subdir = %dir.subdir,
                    "Resolved upload directory"
                );
                dir
            }
            Err(e) => {
                tracing::debug!(owner = ?ctx.owner, error = ?e, "Upload directory rejected");
                ResolvedDirectory::failed(&self.roots.base_root(), e.to_string())
            }
        }
    }

    /// Resolve straight from posted request parameters.
    pub fn resolve_params(&self, params: UploadRequestParams) -> ResolvedDirectory {
        self.resolve(&OwnerContext::from(params))
    }

    pub fn try_resolve(&self, ctx: &OwnerContext) -> Result<ResolvedDirectory, ResolveError> {
        if let Some(sub_path) = ctx.explicit_sub_path() {
            return self.resolve_sub_path(sub_path);
        }

        match ctx.owner {
            Owner::Group(group_id) => self.resolve_group(group_id),
            Owner::Member(user_id) => self.resolve_member(user_id, ctx.requested_visibility()),
        }
    }

    fn resolve_sub_path(&self, sub_path: &str) -> Result<ResolvedDirectory, ResolveError> {
        let trimmed = sub_path.trim_matches('/');
        let invalid = || ResolveError::InvalidDirectory {
            sub_path: sub_path.to_string(),
        };

        if trimmed.is_empty() || !is_plain_relative(Path::new(trimmed)) {
            return Err(invalid());
        }

        let base = self.roots.base_root();
        if !base.path.join(trimmed).is_dir() {
            return Err(invalid());
        }

        Ok(base.join(&format!("/{}", trimmed)))
    }

    fn resolve_group(&self, group_id: u64) -> Result<ResolvedDirectory, ResolveError> {
        let group = self
            .owners
            .lookup_group(group_id)
            .filter(|group| group.id == group_id)
            .ok_or(ResolveError::UnknownGroup { group_id })?;

        // The group's own status wins over whatever the request asked for.
        let visibility = if group.is_public() {
            Visibility::Public
        } else {
            Visibility::Private
        };

        Ok(self
            .roots
            .root(visibility)
            .join(&Owner::Group(group.id).segment()))
    }

    fn resolve_member(
        &self,
        requested_id: u64,
        requested_visibility: Option<&str>,
    ) -> Result<ResolvedDirectory, ResolveError> {
        let mut user_id = requested_id;

        if user_id != 0
            && self
                .owners
                .lookup_user(user_id)
                .filter(|user| user.id == user_id)
                .is_none()
        {
            tracing::debug!(user_id, "Unknown member, using the caller's identity");
            user_id = 0;
        }

        if user_id == 0 {
            user_id = self.owners.current_user_id();
        }

        if user_id == 0 {
            return Err(ResolveError::UnknownUser {
                user_id: requested_id,
            });
        }

        let visibility = match requested_visibility {
            Some(status) if status != "private" => Visibility::Public,
            _ => Visibility::Private,
        };

        Ok(self
            .roots
            .root(visibility)
            .join(&Owner::Member(user_id).segment()))
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}
