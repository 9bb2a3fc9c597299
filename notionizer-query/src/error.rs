use std::fmt::Write;

/// Byte range of a token in the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Failure to parse or type-check a query expression.
///
/// `Display` renders the message, the source line and a caret line under
/// the faulting token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", render(.message, .expression, .span))]
pub struct QueryCompileError {
    message: String,
    expression: String,
    span: Span,
    property: Option<String>,
}

pub type QueryResult<T> = Result<T, QueryCompileError>;

impl QueryCompileError {
    pub(crate) fn new(message: impl Into<String>, expression: &str, span: Span) -> Self {
        Self {
            message: message.into(),
            expression: expression.to_string(),
            span,
            property: None,
        }
    }

    pub(crate) fn for_property(mut self, name: &str) -> Self {
        self.property = Some(name.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The property the error is about, when there is one.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// The text of the faulting token.
    pub fn snippet(&self) -> &str {
        self.expression
            .get(self.span.start..self.span.end)
            .unwrap_or_default()
    }

    /// Zero-based column of the faulting token within its line.
    pub fn column(&self) -> usize {
        let start = self.span.start.min(self.expression.len());
        let line_start = line_start(&self.expression, start);
        self.expression[line_start..start].chars().count()
    }

    /// The line of the expression containing the faulting token.
    pub fn source_line(&self) -> &str {
        source_line(&self.expression, self.span.start)
    }
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |pos| pos + 1)
}

fn source_line(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = line_start(source, offset);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |pos| offset + pos);
    &source[start..end]
}

fn render(message: &str, expression: &str, span: &Span) -> String {
    let offset = span.start.min(expression.len());
    let start = line_start(expression, offset);
    let line = source_line(expression, offset);
    let column = expression[start..offset].chars().count();
    let width = expression
        .get(offset..span.end.min(start + line.len()))
        .map_or(0, |s| s.chars().count())
        .max(1);

    let mut out = String::new();
    let _ = writeln!(out, "{message}");
    let _ = writeln!(out, "{line}");
    let _ = write!(out, "{}{}", " ".repeat(column), "^".repeat(width));
    out
}
