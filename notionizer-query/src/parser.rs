//! Parser for the query expression language.
//!
//! ```text
//! expr      := name | "not" name | compare (boolconn compare)*
//! compare   := name cmpop literal
//! cmpop     := "==" | "!=" | "is" | "is not"
//! boolconn  := "and" | "or"        (one connective per expression)
//! literal   := number | string | True | False
//! name      := identifier | `quoted name`
//! ```

use crate::error::{QueryCompileError, QueryResult, Span};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::tree::BoolOp;
use serde_json::Number;

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Number),
    String(String),
    Bool(bool),
}

impl Literal {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==` or `is`
    Equal,
    /// `!=` or `is not`
    NotEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub name: Name,
    pub op: CmpOp,
    pub op_span: Span,
    pub literal: Literal,
    pub literal_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare `name`.
    Exists(Name),
    /// `not name`.
    Missing(Name),
    /// One or more comparisons joined by a single connective. `connective` is
    /// `None` for a lone comparison.
    Compare {
        connective: Option<BoolOp>,
        terms: Vec<Compare>,
    },
}

/// Parses an expression into its syntax tree.
pub fn parse(source: &str) -> QueryResult<Expr> {
    let tokens = tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .parse_expr()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &SpannedToken {
        // tokenize always terminates with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> SpannedToken {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>, span: Span) -> QueryCompileError {
        QueryCompileError::new(message, self.source, span)
    }

    fn unexpected(&self, expected: &str) -> QueryCompileError {
        let found = self.peek();
        self.error(
            format!("expected {expected}, found {}", found.token.describe()),
            found.span,
        )
    }

    fn parse_expr(&mut self) -> QueryResult<Expr> {
        if self.peek().token == Token::Eof {
            return Err(self.unexpected("a property name"));
        }

        if self.peek().token == Token::Not {
            self.advance();
            let name = self.parse_name()?;
            self.expect_eof()?;
            return Ok(Expr::Missing(name));
        }

        let name = self.parse_name()?;
        if self.peek().token == Token::Eof {
            return Ok(Expr::Exists(name));
        }

        let mut terms = vec![self.parse_compare_rest(name)?];
        let mut connective: Option<BoolOp> = None;
        loop {
            let next = self.peek().clone();
            let op = match next.token {
                Token::Eof => break,
                Token::And => BoolOp::And,
                Token::Or => BoolOp::Or,
                Token::EqEq | Token::NotEq | Token::Is => {
                    return Err(self.error("chained comparisons are not supported", next.span));
                }
                _ => return Err(self.unexpected("'and', 'or' or end of expression")),
            };
            match connective {
                Some(current) if current != op => {
                    return Err(self.error(
                        format!(
                            "cannot mix '{current}' and '{op}' in one expression; compose nested filters instead"
                        ),
                        next.span,
                    ));
                }
                _ => connective = Some(op),
            }
            self.advance();
            let name = self.parse_name()?;
            terms.push(self.parse_compare_rest(name)?);
        }

        Ok(Expr::Compare { connective, terms })
    }

    fn parse_name(&mut self) -> QueryResult<Name> {
        let next = self.peek().clone();
        match next.token {
            Token::Identifier(text) | Token::QuotedName(text) => {
                self.advance();
                Ok(Name {
                    text,
                    span: next.span,
                })
            }
            _ => Err(self.unexpected("a property name")),
        }
    }

    fn parse_compare_rest(&mut self, name: Name) -> QueryResult<Compare> {
        let (op, op_span) = self.parse_cmp_op()?;
        let (literal, literal_span) = self.parse_literal()?;
        Ok(Compare {
            name,
            op,
            op_span,
            literal,
            literal_span,
        })
    }

    fn parse_cmp_op(&mut self) -> QueryResult<(CmpOp, Span)> {
        let next = self.peek().clone();
        match next.token {
            Token::EqEq => {
                self.advance();
                Ok((CmpOp::Equal, next.span))
            }
            Token::NotEq => {
                self.advance();
                Ok((CmpOp::NotEqual, next.span))
            }
            Token::Is => {
                self.advance();
                if self.peek().token == Token::Not {
                    let not = self.advance();
                    Ok((CmpOp::NotEqual, Span::new(next.span.start, not.span.end)))
                } else {
                    Ok((CmpOp::Equal, next.span))
                }
            }
            _ => Err(self.unexpected("'==', '!=', 'is' or 'is not'")),
        }
    }

    fn parse_literal(&mut self) -> QueryResult<(Literal, Span)> {
        let next = self.peek().clone();
        let literal = match next.token {
            Token::Number(n) => Literal::Number(n),
            Token::String(s) => Literal::String(s),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            _ => return Err(self.unexpected("a literal")),
        };
        self.advance();
        Ok((literal, next.span))
    }

    fn expect_eof(&self) -> QueryResult<()> {
        if self.peek().token == Token::Eof {
            Ok(())
        } else {
            Err(self.unexpected("end of expression"))
        }
    }
}
