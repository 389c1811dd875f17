use serde::{Deserialize, Serialize};
use validator::Validate;

/// Entity that owns a piece of media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "object", content = "object_id", rename_all = "lowercase")]
pub enum Owner {
    /// A member; id `0` stands for the authenticated caller.
    #[serde(rename = "members")]
    Member(u64),
    #[serde(rename = "groups")]
    Group(u64),
}

impl Owner {
    pub fn id(&self) -> u64 {
        match self {
            Owner::Member(id) | Owner::Group(id) => *id,
        }
    }

    /// Directory segment naming the owner kind (`members` or `groups`).
    pub fn kind_dir(&self) -> &'static str {
        match self {
            Owner::Member(_) => "members",
            Owner::Group(_) => "groups",
        }
    }

    /// Path segment of the owner's directory below a visibility root.
    pub fn segment(&self) -> String {
        format!("/{}/{}", self.kind_dir(), self.id())
    }
}

/// Ownership parameters of one upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerContext {
    pub owner: Owner,
    /// Raw requested visibility; an empty value means "not specified".
    pub requested_visibility: Option<String>,
    /// Sub-path below the upload base that bypasses ownership resolution.
    pub explicit_sub_path: Option<String>,
}

impl OwnerContext {
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            requested_visibility: None,
            explicit_sub_path: None,
        }
    }

    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.requested_visibility = Some(visibility.into());
        self
    }

    pub fn with_sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.explicit_sub_path = Some(sub_path.into());
        self
    }

    pub fn requested_visibility(&self) -> Option<&str> {
        self.requested_visibility.as_deref().filter(|v| !v.is_empty())
    }

    pub fn explicit_sub_path(&self) -> Option<&str> {
        self.explicit_sub_path.as_deref().filter(|p| !p.is_empty())
    }
}

fn default_status() -> String {
    "private".to_string()
}

fn default_object() -> String {
    "members".to_string()
}

/// Upload request parameters as posted by the client, with their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UploadRequestParams {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_object")]
    pub object: String,
    #[serde(default)]
    pub object_id: u64,
    #[serde(default)]
    #[validate(length(max = 1024, message = "parent_dir is too long"))]
    pub parent_dir: String,
}

impl Default for UploadRequestParams {
    fn default() -> Self {
        Self {
            status: default_status(),
            object: default_object(),
            object_id: 0,
            parent_dir: String::new(),
        }
    }
}

impl From<UploadRequestParams> for OwnerContext {
    fn from(params: UploadRequestParams) -> Self {
        let owner = match params.object.as_str() {
            "groups" => Owner::Group(params.object_id),
            _ => Owner::Member(params.object_id),
        };

        OwnerContext {
            owner,
            requested_visibility: Some(params.status).filter(|s| !s.is_empty()),
            explicit_sub_path: Some(params.parent_dir).filter(|p| !p.is_empty()),
        }
    }
}

/// Group as reported by the owner-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: u64,
    /// Group status; only the literal `"public"` is significant.
    pub status: String,
}

impl GroupRecord {
    pub fn is_public(&self) -> bool {
        self.status == "public"
    }
}

/// Member as reported by the owner-lookup collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
}
