//! In-memory owner directory, for tests and operator tooling.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use attachments_core::models::{GroupRecord, UserRecord};
use attachments_core::AppError;
use serde::Deserialize;

use crate::traits::OwnerDirectory;

/// Owner directory backed by fixed member and group tables.
#[derive(Debug, Clone, Default)]
pub struct StaticOwnerDirectory {
    users: HashSet<u64>,
    groups: HashMap<u64, GroupRecord>,
    current_user_id: u64,
}

/// On-disk form of a [`StaticOwnerDirectory`].
#[derive(Debug, Deserialize)]
struct OwnerDirectoryFile {
    #[serde(default)]
    current_user_id: u64,
    #[serde(default)]
    users: Vec<u64>,
    #[serde(default)]
    groups: Vec<GroupRecord>,
}

impl StaticOwnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: u64) -> Self {
        self.users.insert(id);
        self
    }

    pub fn with_group(mut self, id: u64, status: impl Into<String>) -> Self {
        self.groups.insert(
            id,
            GroupRecord {
                id,
                status: status.into(),
            },
        );
        self
    }

    /// Set the authenticated caller. The caller is also a known member.
    pub fn acting_as(mut self, user_id: u64) -> Self {
        if user_id != 0 {
            self.users.insert(user_id);
        }
        self.current_user_id = user_id;
        self
    }

    /// Load from a JSON document:
    /// `{"current_user_id": 1, "users": [1, 2], "groups": [{"id": 7, "status": "public"}]}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: OwnerDirectoryFile = serde_json::from_str(&raw)?;

        let directory = file
            .groups
            .into_iter()
            .fold(Self::new(), |dir, group| dir.with_group(group.id, group.status));
        let directory = file
            .users
            .into_iter()
            .fold(directory, |dir, id| dir.with_user(id));

        Ok(directory.acting_as(file.current_user_id))
    }
}

impl OwnerDirectory for StaticOwnerDirectory {
    fn lookup_group(&self, id: u64) -> Option<GroupRecord> {
        self.groups.get(&id).cloned()
    }

    fn lookup_user(&self, id: u64) -> Option<UserRecord> {
        self.users.contains(&id).then_some(UserRecord { id })
    }

    fn current_user_id(&self) -> u64 {
        self.current_user_id
    }
}
