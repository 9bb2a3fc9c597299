use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire type tag of a property.
///
/// `Text` only appears in database schemas, where the service's `rich_text`
/// column is tracked under its own tag because schema and row payloads differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Text,
    Number,
    Select,
    MultiSelect,
    Status,
    Date,
    People,
    Files,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    Relation,
    Rollup,
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 21] = [
        Self::Title,
        Self::RichText,
        Self::Text,
        Self::Number,
        Self::Select,
        Self::MultiSelect,
        Self::Status,
        Self::Date,
        Self::People,
        Self::Files,
        Self::Checkbox,
        Self::Url,
        Self::Email,
        Self::PhoneNumber,
        Self::Formula,
        Self::Relation,
        Self::Rollup,
        Self::CreatedTime,
        Self::CreatedBy,
        Self::LastEditedTime,
        Self::LastEditedBy,
    ];

    #[must_use]
    pub const fn as_wire(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Status => "status",
            Self::Date => "date",
            Self::People => "people",
            Self::Files => "files",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Formula => "formula",
            Self::Relation => "relation",
            Self::Rollup => "rollup",
            Self::CreatedTime => "created_time",
            Self::CreatedBy => "created_by",
            Self::LastEditedTime => "last_edited_time",
            Self::LastEditedBy => "last_edited_by",
        }
    }

    /// Looks up a wire tag. Unknown tags return `None`.
    #[must_use]
    pub fn from_wire(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_wire() == tag)
    }

    /// The key the service expects in request bodies. Schema-side `text`
    /// columns are written back as `rich_text`.
    #[must_use]
    pub const fn request_key(&self) -> &'static str {
        match self {
            Self::Text => "rich_text",
            other => other.as_wire(),
        }
    }

    /// Values computed by the service (never writable).
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(
            self,
            Self::Formula
                | Self::Rollup
                | Self::CreatedTime
                | Self::CreatedBy
                | Self::LastEditedTime
                | Self::LastEditedBy
        )
    }

    /// Kinds whose values are rich-text arrays.
    #[must_use]
    pub const fn is_rich_text(&self) -> bool {
        matches!(self, Self::Title | Self::RichText | Self::Text)
    }

    /// Kinds with a configurable option list.
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect | Self::Status)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}
