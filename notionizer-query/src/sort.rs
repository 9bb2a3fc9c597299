use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Entity timestamps a query can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    CreatedTime,
    LastEditedTime,
}

impl TimestampKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedTime => "created_time",
            Self::LastEditedTime => "last_edited_time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Property(String),
    Timestamp(TimestampKind),
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: Direction,
}

pub fn sort_by_timestamp(timestamp: TimestampKind, direction: Direction) -> Sort {
    Sort {
        key: SortKey::Timestamp(timestamp),
        direction,
    }
}

pub fn sort_by_property(name: impl Into<String>, direction: Direction) -> Sort {
    Sort {
        key: SortKey::Property(name.into()),
        direction,
    }
}

impl Serialize for Sort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match &self.key {
            SortKey::Property(name) => map.serialize_entry("property", name)?,
            SortKey::Timestamp(ts) => map.serialize_entry("timestamp", ts.as_str())?,
        }
        map.serialize_entry("direction", self.direction.as_str())?;
        map.end()
    }
}

/// Ordered list of sort criteria; earlier entries take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    sorts: Vec<Sort>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn then(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn add(&mut self, sort: Sort) -> &mut Self {
        self.sorts.push(sort);
        self
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Sort> for SortSpec {
    fn from(sort: Sort) -> Self {
        Self { sorts: vec![sort] }
    }
}

impl FromIterator<Sort> for SortSpec {
    fn from_iter<I: IntoIterator<Item = Sort>>(iter: I) -> Self {
        Self {
            sorts: iter.into_iter().collect(),
        }
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sorts.serialize(serializer)
    }
}
