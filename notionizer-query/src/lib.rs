//! Query building for notionizer databases.
//!
//! Two ways to produce the service's nested filter format:
//! - the programmatic builders in [`condition`] combined with [`FilterTree`]
//! - [`compile`], which type-checks a short expression such as
//!   `` Done == False and `Due date` is "2022-03-25" `` against a database's
//!   live schema
//!
//! Sorts are built independently with [`sort_by_property`] and
//! [`sort_by_timestamp`].

pub mod condition;
mod compiler;
mod error;
pub mod lexer;
pub mod parser;
mod sort;
mod tree;

pub use compiler::{QueryCompiler, compile};
pub use condition::{FilterCondition, FilterFamily, Operator};
pub use error::{QueryCompileError, QueryResult, Span};
pub use sort::{Direction, Sort, SortKey, SortSpec, TimestampKind, sort_by_property, sort_by_timestamp};
pub use tree::{BoolOp, FilterNode, FilterTree};
