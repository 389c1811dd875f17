use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Visibility of stored media: which top-level root it lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Lenient parse: anything other than exactly `"private"` is public.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Path/URL segment appended to the upload base, e.g. `/public`.
    pub fn segment(&self) -> &'static str {
        match self {
            Visibility::Public => "/public",
            Visibility::Private => "/private",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
