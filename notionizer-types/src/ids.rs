//! Identifier type for remote objects.
//!
//! The service reports ids in hyphenated form but accepts (and shows in
//! share links) the 32-character simple form as well. Both parse to the same
//! [`ObjectId`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier of a database, page or user on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a random id. Only useful for fixtures; the service assigns real ids.
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an object id from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an id in hyphenated or simple (undashed) form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }

    /// Extracts the id from a share link such as
    /// `https://www.notion.so/workspace/a8aec43384f447ed84390e8e42c2e089?v=...`.
    ///
    /// The id is the trailing 32 hex characters of the last path segment,
    /// which may be prefixed by a slugified title.
    pub fn from_url(url: &str) -> Result<Self, uuid::Error> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let segment = without_query
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(without_query);
        if let Ok(id) = Self::parse(segment) {
            return Ok(id);
        }
        let tail = segment
            .char_indices()
            .rev()
            .nth(31)
            .map_or(segment, |(idx, _)| &segment[idx..]);
        Self::parse(tail)
    }

    /// Returns the 32-character undashed form used in share links.
    #[must_use]
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ObjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
