//! Tokens of the query expression language.

use crate::error::{QueryCompileError, QueryResult, Span};
use logos::Logos;
use serde_json::Number;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("is")]
    Is,
    #[token("True")]
    True,
    #[token("False")]
    False,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `` `Due date` ``: property names with spaces or punctuation.
    #[regex(r"`[^`]+`", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    QuotedName(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| parse_number(lex.slice()))]
    Number(Number),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    String(String),

    Eof,
}

impl Token {
    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::And => "'and'".into(),
            Self::Or => "'or'".into(),
            Self::Not => "'not'".into(),
            Self::Is => "'is'".into(),
            Self::True => "'True'".into(),
            Self::False => "'False'".into(),
            Self::EqEq => "'=='".into(),
            Self::NotEq => "'!='".into(),
            Self::Identifier(name) | Self::QuotedName(name) => format!("name '{name}'"),
            Self::Number(n) => format!("number {n}"),
            Self::String(s) => format!("string \"{s}\""),
            Self::Eof => "end of expression".into(),
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    if text.contains('.') {
        text.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        text.parse::<i64>()
            .ok()
            .map(Number::from)
            .or_else(|| text.parse::<f64>().ok().and_then(Number::from_f64))
    }
}

fn unescape(quoted: &str) -> String {
    let body = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

/// Tokenizes an expression, terminated by [`Token::Eof`].
pub fn tokenize(source: &str) -> QueryResult<Vec<SpannedToken>> {
    let mut lex = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lex.next() {
        let span = Span::new(lex.span().start, lex.span().end);
        match result {
            Ok(token) => tokens.push(SpannedToken::new(token, span)),
            Err(()) => {
                return Err(QueryCompileError::new(
                    format!("invalid token '{}'", lex.slice()),
                    source,
                    span,
                ));
            }
        }
    }

    tokens.push(SpannedToken::new(
        Token::Eof,
        Span::new(source.len(), source.len()),
    ));
    Ok(tokens)
}
