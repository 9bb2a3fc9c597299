//! Kinds of top-level remote objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The `object` discriminator of a top-level entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Database,
    Page,
}

impl ObjectKind {
    /// The wire tag (`"database"` / `"page"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Page => "page",
        }
    }

    /// The REST collection this kind lives under.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Database => "databases",
            Self::Page => "pages",
        }
    }

    /// Parses the `object` field of an entity.
    pub fn from_wire(tag: &str) -> crate::Result<Self> {
        match tag {
            "database" => Ok(Self::Database),
            "page" => Ok(Self::Page),
            other => Err(crate::Error::UnknownObjectKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}
