//! Filter conditions and per-family builders.
//!
//! Each builder is bound to one property and produces a
//! [`FilterCondition`] per operator, mirroring the operators the service
//! accepts for that property family.

use notionizer_model::PropertyKind;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value, json};

/// Operators understood by the service's filter endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    DoesNotEqual,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
    PastWeek,
    PastMonth,
    PastYear,
    NextWeek,
    NextMonth,
    NextYear,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::DoesNotEqual => "does_not_equal",
            Self::Contains => "contains",
            Self::DoesNotContain => "does_not_contain",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            Self::LessThanOrEqualTo => "less_than_or_equal_to",
            Self::Before => "before",
            Self::After => "after",
            Self::OnOrBefore => "on_or_before",
            Self::OnOrAfter => "on_or_after",
            Self::PastWeek => "past_week",
            Self::PastMonth => "past_month",
            Self::PastYear => "past_year",
            Self::NextWeek => "next_week",
            Self::NextMonth => "next_month",
            Self::NextYear => "next_year",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }
}

/// Group of property kinds sharing one set of filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFamily {
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    People,
    Files,
    Relation,
}

impl FilterFamily {
    /// `None` for formula and rollup columns.
    pub const fn for_kind(kind: PropertyKind) -> Option<Self> {
        use PropertyKind as K;
        Some(match kind {
            K::Title | K::Text | K::RichText | K::Url | K::Email | K::PhoneNumber => Self::Text,
            K::Number => Self::Number,
            K::Checkbox => Self::Checkbox,
            K::Select | K::Status => Self::Select,
            K::MultiSelect => Self::MultiSelect,
            K::Date | K::CreatedTime | K::LastEditedTime => Self::Date,
            K::People | K::CreatedBy | K::LastEditedBy => Self::People,
            K::Files => Self::Files,
            K::Relation => Self::Relation,
            K::Formula | K::Rollup => return None,
        })
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
            Self::People => "people",
            Self::Files => "files",
            Self::Relation => "relation",
        }
    }
}

/// One `{property, <wire>: {<op>: operand}}` filter entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    property: String,
    wire_type: String,
    operator: Operator,
    operand: Value,
}

impl FilterCondition {
    pub fn new(
        property: impl Into<String>,
        wire_type: impl Into<String>,
        operator: Operator,
        operand: Value,
    ) -> Self {
        Self {
            property: property.into(),
            wire_type: wire_type.into(),
            operator,
            operand,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn wire_type(&self) -> &str {
        &self.wire_type
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Value {
        &self.operand
    }
}

impl Serialize for FilterCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("property", &self.property)?;
        let mut body = Map::new();
        body.insert(self.operator.as_str().to_string(), self.operand.clone());
        map.serialize_entry(&self.wire_type, &body)?;
        map.end()
    }
}

/// Property name plus the key conditions are filed under.
#[derive(Debug, Clone)]
struct Target {
    property: String,
    wire_type: &'static str,
}

impl Target {
    fn new(property: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            property: property.into(),
            wire_type: kind.request_key(),
        }
    }

    fn build(self, operator: Operator, operand: Value) -> FilterCondition {
        FilterCondition::new(self.property, self.wire_type, operator, operand)
    }

    fn is_empty(self) -> FilterCondition {
        self.build(Operator::IsEmpty, Value::Bool(true))
    }

    fn is_not_empty(self) -> FilterCondition {
        self.build(Operator::IsNotEmpty, Value::Bool(true))
    }
}

// ── Text ─────────────────────────────────────────────────────────

/// Title, rich text, url, email and phone number columns.
#[derive(Debug, Clone)]
pub struct TextCondition(Target);

impl TextCondition {
    /// `kind` picks the wire key; non-text kinds fall back to `rich_text`.
    pub fn new(property: impl Into<String>, kind: PropertyKind) -> Self {
        let kind = match FilterFamily::for_kind(kind) {
            Some(FilterFamily::Text) => kind,
            _ => PropertyKind::RichText,
        };
        Self(Target::new(property, kind))
    }

    pub fn title(property: impl Into<String>) -> Self {
        Self::new(property, PropertyKind::Title)
    }

    pub fn rich_text(property: impl Into<String>) -> Self {
        Self::new(property, PropertyKind::RichText)
    }

    pub fn equals(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Equals, Value::String(text.into()))
    }

    pub fn does_not_equal(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::DoesNotEqual, Value::String(text.into()))
    }

    pub fn contains(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Contains, Value::String(text.into()))
    }

    pub fn does_not_contain(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::DoesNotContain, Value::String(text.into()))
    }

    pub fn starts_with(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::StartsWith, Value::String(text.into()))
    }

    pub fn ends_with(self, text: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::EndsWith, Value::String(text.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

// ── Number ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NumberCondition(Target);

impl NumberCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Number))
    }

    pub fn equals(self, n: impl Into<Number>) -> FilterCondition {
        self.0.build(Operator::Equals, Value::Number(n.into()))
    }

    pub fn does_not_equal(self, n: impl Into<Number>) -> FilterCondition {
        self.0.build(Operator::DoesNotEqual, Value::Number(n.into()))
    }

    pub fn greater_than(self, n: impl Into<Number>) -> FilterCondition {
        self.0.build(Operator::GreaterThan, Value::Number(n.into()))
    }

    pub fn less_than(self, n: impl Into<Number>) -> FilterCondition {
        self.0.build(Operator::LessThan, Value::Number(n.into()))
    }

    pub fn greater_than_or_equal_to(self, n: impl Into<Number>) -> FilterCondition {
        self.0
            .build(Operator::GreaterThanOrEqualTo, Value::Number(n.into()))
    }

    pub fn less_than_or_equal_to(self, n: impl Into<Number>) -> FilterCondition {
        self.0
            .build(Operator::LessThanOrEqualTo, Value::Number(n.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

// ── Checkbox ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CheckboxCondition(Target);

impl CheckboxCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Checkbox))
    }

    pub fn equals(self, checked: bool) -> FilterCondition {
        self.0.build(Operator::Equals, Value::Bool(checked))
    }

    pub fn does_not_equal(self, checked: bool) -> FilterCondition {
        self.0.build(Operator::DoesNotEqual, Value::Bool(checked))
    }
}

// ── Select / status ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SelectCondition(Target);

impl SelectCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Select))
    }

    pub fn status(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Status))
    }

    pub fn equals(self, option: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Equals, Value::String(option.into()))
    }

    pub fn does_not_equal(self, option: impl Into<String>) -> FilterCondition {
        self.0
            .build(Operator::DoesNotEqual, Value::String(option.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

// ── Multi-select ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MultiSelectCondition(Target);

impl MultiSelectCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::MultiSelect))
    }

    pub fn contains(self, option: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Contains, Value::String(option.into()))
    }

    pub fn does_not_contain(self, option: impl Into<String>) -> FilterCondition {
        self.0
            .build(Operator::DoesNotContain, Value::String(option.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

// ── Date ─────────────────────────────────────────────────────────

/// Date, created-time and last-edited-time columns.
///
/// With a timezone set, date-time operands without an offset get it
/// appended (`"2021-10-15T12:00:00"` → `"2021-10-15T12:00:00+09:00"`).
/// Plain dates are left alone.
#[derive(Debug, Clone)]
pub struct DateCondition {
    target: Target,
    timezone: Option<String>,
}

impl DateCondition {
    pub fn new(property: impl Into<String>, kind: PropertyKind) -> Self {
        let kind = match kind {
            PropertyKind::CreatedTime | PropertyKind::LastEditedTime => kind,
            _ => PropertyKind::Date,
        };
        Self {
            target: Target::new(property, kind),
            timezone: None,
        }
    }

    pub fn date(property: impl Into<String>) -> Self {
        Self::new(property, PropertyKind::Date)
    }

    /// Accepts `"+09:00"`, `"-02:00"` or `"09:00"` (treated as positive).
    #[must_use]
    pub fn with_timezone(mut self, timezone: &str) -> Self {
        let tz = timezone.trim();
        self.timezone = match tz.chars().next() {
            None => None,
            Some('+' | '-') => Some(tz.to_string()),
            Some(_) => Some(format!("+{tz}")),
        };
        self
    }

    fn stamp(&self, datetime: &str) -> Value {
        Value::String(match &self.timezone {
            Some(tz) if needs_offset(datetime) => format!("{datetime}{tz}"),
            _ => datetime.to_string(),
        })
    }

    fn at(self, operator: Operator, datetime: &str) -> FilterCondition {
        let operand = self.stamp(datetime);
        self.target.build(operator, operand)
    }

    fn relative(self, operator: Operator) -> FilterCondition {
        self.target.build(operator, json!({}))
    }

    pub fn equals(self, datetime: &str) -> FilterCondition {
        self.at(Operator::Equals, datetime)
    }

    pub fn before(self, datetime: &str) -> FilterCondition {
        self.at(Operator::Before, datetime)
    }

    pub fn after(self, datetime: &str) -> FilterCondition {
        self.at(Operator::After, datetime)
    }

    pub fn on_or_before(self, datetime: &str) -> FilterCondition {
        self.at(Operator::OnOrBefore, datetime)
    }

    pub fn on_or_after(self, datetime: &str) -> FilterCondition {
        self.at(Operator::OnOrAfter, datetime)
    }

    pub fn past_week(self) -> FilterCondition {
        self.relative(Operator::PastWeek)
    }

    pub fn past_month(self) -> FilterCondition {
        self.relative(Operator::PastMonth)
    }

    pub fn past_year(self) -> FilterCondition {
        self.relative(Operator::PastYear)
    }

    pub fn next_week(self) -> FilterCondition {
        self.relative(Operator::NextWeek)
    }

    pub fn next_month(self) -> FilterCondition {
        self.relative(Operator::NextMonth)
    }

    pub fn next_year(self) -> FilterCondition {
        self.relative(Operator::NextYear)
    }

    pub fn is_empty(self) -> FilterCondition {
        self.target.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.target.is_not_empty()
    }
}

/// True for a date-time (has a time part) with neither `Z` nor an offset.
fn needs_offset(datetime: &str) -> bool {
    match datetime.split_once('T') {
        Some((_, time)) => !(time.ends_with('Z') || time.contains('+') || time.contains('-')),
        None => false,
    }
}

// ── People / relation ────────────────────────────────────────────

/// People, created-by and last-edited-by columns. Operands are user ids.
#[derive(Debug, Clone)]
pub struct PeopleCondition(Target);

impl PeopleCondition {
    pub fn new(property: impl Into<String>, kind: PropertyKind) -> Self {
        let kind = match kind {
            PropertyKind::CreatedBy | PropertyKind::LastEditedBy => kind,
            _ => PropertyKind::People,
        };
        Self(Target::new(property, kind))
    }

    pub fn people(property: impl Into<String>) -> Self {
        Self::new(property, PropertyKind::People)
    }

    pub fn contains(self, user_id: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Contains, Value::String(user_id.into()))
    }

    pub fn does_not_contain(self, user_id: impl Into<String>) -> FilterCondition {
        self.0
            .build(Operator::DoesNotContain, Value::String(user_id.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

/// Operands are page ids.
#[derive(Debug, Clone)]
pub struct RelationCondition(Target);

impl RelationCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Relation))
    }

    pub fn contains(self, page_id: impl Into<String>) -> FilterCondition {
        self.0.build(Operator::Contains, Value::String(page_id.into()))
    }

    pub fn does_not_contain(self, page_id: impl Into<String>) -> FilterCondition {
        self.0
            .build(Operator::DoesNotContain, Value::String(page_id.into()))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}

// ── Files ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FilesCondition(Target);

impl FilesCondition {
    pub fn new(property: impl Into<String>) -> Self {
        Self(Target::new(property, PropertyKind::Files))
    }

    pub fn is_empty(self) -> FilterCondition {
        self.0.is_empty()
    }

    pub fn is_not_empty(self) -> FilterCondition {
        self.0.is_not_empty()
    }
}
