//! Type-checks parsed expressions against a schema and lowers them to
//! filter trees.

use crate::condition::{
    CheckboxCondition, DateCondition, FilterCondition, FilterFamily, MultiSelectCondition,
    NumberCondition, Operator, PeopleCondition, RelationCondition, SelectCondition, TextCondition,
};
use crate::error::{QueryCompileError, QueryResult, Span};
use crate::parser::{self, CmpOp, Compare, Expr, Literal, Name};
use crate::sort::{Direction, Sort, sort_by_property};
use crate::tree::{BoolOp, FilterTree};
use notionizer_model::{PropertiesCollection, PropertyKind};
use serde_json::Value;
use tracing::debug;

/// Compiles expressions against one database's live schema.
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler<'a> {
    schema: &'a PropertiesCollection,
}

/// Compiles `source` against `schema`.
pub fn compile(source: &str, schema: &PropertiesCollection) -> QueryResult<FilterTree> {
    QueryCompiler::new(schema).compile(source)
}

impl<'a> QueryCompiler<'a> {
    pub fn new(schema: &'a PropertiesCollection) -> Self {
        Self { schema }
    }

    /// Parses, resolves and lowers an expression.
    ///
    /// A single condition is wrapped in an `or` node.
    pub fn compile(&self, source: &str) -> QueryResult<FilterTree> {
        let expr = parser::parse(source)?;
        let (op, conditions) = match expr {
            Expr::Exists(name) => (BoolOp::default(), vec![self.existence(source, &name, true)?]),
            Expr::Missing(name) => (BoolOp::default(), vec![self.existence(source, &name, false)?]),
            Expr::Compare { connective, terms } => (
                connective.unwrap_or_default(),
                terms
                    .iter()
                    .map(|term| self.compare(source, term))
                    .collect::<QueryResult<Vec<_>>>()?,
            ),
        };

        let mut tree = FilterTree::new(op);
        for condition in conditions {
            tree.push(condition);
        }
        debug!(expression = source, conditions = tree.len(), "compiled query expression");
        Ok(tree)
    }

    /// Builds a property sort after checking the column exists.
    pub fn sort(&self, name: &str, direction: Direction) -> QueryResult<Sort> {
        if self.schema.contains(name) {
            Ok(sort_by_property(name, direction))
        } else {
            Err(
                QueryCompileError::new(format!("unknown property '{name}'"), name, Span::new(0, name.len()))
                    .for_property(name),
            )
        }
    }

    fn resolve(&self, source: &str, name: &Name) -> QueryResult<(PropertyKind, FilterFamily)> {
        let fail = |message: String| {
            QueryCompileError::new(message, source, name.span).for_property(&name.text)
        };
        let column = self
            .schema
            .get(&name.text)
            .ok_or_else(|| fail(format!("unknown property '{}'", name.text)))?;
        let kind = column.kind().ok_or_else(|| {
            fail(format!(
                "property '{}' has unsupported type '{}'",
                name.text,
                column.wire_type()
            ))
        })?;
        let family = FilterFamily::for_kind(kind).ok_or_else(|| {
            fail(format!(
                "property '{}' of type '{kind}' cannot be filtered",
                name.text
            ))
        })?;
        Ok((kind, family))
    }

    /// Bare `name` / `not name`. Checkboxes have no emptiness, so they test
    /// for checked / unchecked instead.
    fn existence(&self, source: &str, name: &Name, present: bool) -> QueryResult<FilterCondition> {
        let (kind, family) = self.resolve(source, name)?;
        if family == FilterFamily::Checkbox {
            return Ok(CheckboxCondition::new(&name.text).equals(present));
        }
        let operator = if present {
            Operator::IsNotEmpty
        } else {
            Operator::IsEmpty
        };
        Ok(FilterCondition::new(
            &name.text,
            kind.request_key(),
            operator,
            Value::Bool(true),
        ))
    }

    fn compare(&self, source: &str, term: &Compare) -> QueryResult<FilterCondition> {
        let (kind, family) = self.resolve(source, &term.name)?;
        let name = term.name.text.as_str();
        let equal = term.op == CmpOp::Equal;
        let fail = |message: String, span: Span| {
            QueryCompileError::new(message, source, span).for_property(name)
        };

        let condition = match (family, &term.literal) {
            (FilterFamily::Text, Literal::String(s)) => {
                let c = TextCondition::new(name, kind);
                if equal { c.equals(s) } else { c.does_not_equal(s) }
            }
            (FilterFamily::Number, Literal::Number(n)) => {
                let c = NumberCondition::new(name);
                if equal {
                    c.equals(n.clone())
                } else {
                    c.does_not_equal(n.clone())
                }
            }
            (FilterFamily::Checkbox, Literal::Bool(b)) => {
                let c = CheckboxCondition::new(name);
                if equal { c.equals(*b) } else { c.does_not_equal(*b) }
            }
            (FilterFamily::Select, Literal::String(s)) => {
                let c = if kind == PropertyKind::Status {
                    SelectCondition::status(name)
                } else {
                    SelectCondition::new(name)
                };
                if equal { c.equals(s) } else { c.does_not_equal(s) }
            }
            (FilterFamily::MultiSelect, Literal::String(s)) => {
                let c = MultiSelectCondition::new(name);
                if equal { c.contains(s) } else { c.does_not_contain(s) }
            }
            (FilterFamily::Date, Literal::String(s)) => {
                if !equal {
                    return Err(fail(
                        format!("date property '{name}' does not support inequality"),
                        term.op_span,
                    ));
                }
                DateCondition::new(name, kind).equals(s)
            }
            (FilterFamily::People, Literal::String(s)) => {
                let c = PeopleCondition::new(name, kind);
                if equal { c.contains(s) } else { c.does_not_contain(s) }
            }
            (FilterFamily::Relation, Literal::String(s)) => {
                let c = RelationCondition::new(name);
                if equal { c.contains(s) } else { c.does_not_contain(s) }
            }
            (FilterFamily::Files, _) => {
                return Err(fail(
                    format!("files property '{name}' only supports existence tests"),
                    term.op_span,
                ));
            }
            (family, literal) => {
                return Err(fail(
                    format!(
                        "property '{name}' expects a {} literal, got {}",
                        expected_literal(family),
                        literal.kind_name()
                    ),
                    term.literal_span,
                ));
            }
        };
        Ok(condition)
    }
}

fn expected_literal(family: FilterFamily) -> &'static str {
    match family {
        FilterFamily::Number => "number",
        FilterFamily::Checkbox => "boolean",
        _ => "string",
    }
}
