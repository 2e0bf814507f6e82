//! sql-filter-parser: a generic, grammar-driven string parser
//! specialized to safely rewrite SQL-like WHERE-clause filter
//! expressions into parameterized queries.
//!
//! Three layers, innermost first:
//! - [`state_machine`]: a generic finite-state-machine engine, opaque to
//!   what `T` (state metadata) and `U` (transition input) actually are.
//! - [`string_parser`]: a façade binding a [`string_parser::Scanner`] to
//!   a [`string_parser::Grammar`] via a transition interceptor, producing
//!   1-based-position-wrapped errors.
//! - [`sql`]: the concrete WHERE-clause dialect — scanner, grammar, and
//!   the interceptor that rewrites tokens into a parameterized query and
//!   ordered bind values.
//!
//! Most callers only need [`sql::new_sql_parser`] and [`sql::SqlParser`].

pub mod error;
pub mod sql;
pub mod state_machine;
pub mod string_parser;

pub use error::{ParserError, ParserErrorKind, TransitionError};
pub use sql::{new_sql_parser, SqlParser, SqlParserOptions};
