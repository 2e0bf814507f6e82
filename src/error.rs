//! Error types for sql-filter-parser

use thiserror::Error;

/// Coarse-grained error category, for callers that need to branch on the
/// kind of failure without matching on the rendered message (see spec
/// §7: "callers that need to branch must match on message substring or
/// an error-kind tag added during re-implementation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorKind {
    /// No successor state accepted the current token.
    Syntax,
    /// A `)` was seen with no matching open brace.
    UnbalancedClose,
    /// A column was rejected by the configured allow-list.
    InvalidColumn,
    /// The configured complexity cap was exceeded.
    ComplexityExceeded,
    /// The token stream ended in a non-terminal state.
    PrematureEnd,
    /// The token stream ended with unclosed braces.
    UnbalancedOpenAtEof,
    /// A grammar's regex acceptor failed to compile.
    InvalidGrammar,
}

/// A failure raised while moving a single token through the state
/// machine: either no successor state accepted it, or the transition
/// interceptor rejected it. Carries no position — the string-parser
/// façade is the single place that knows the current token's position,
/// and attaches it when converting this into a [`ParserError`]. Public
/// because custom interceptors (see `with_transition_interceptor`) must
/// be able to construct one.
#[derive(Debug, Clone)]
pub struct TransitionError {
    pub kind: ParserErrorKind,
    pub message: String,
}

impl TransitionError {
    pub fn unexpected_token(token: &str) -> Self {
        TransitionError {
            kind: ParserErrorKind::Syntax,
            message: format!("unexpected token `{token}`"),
        }
    }

    pub fn unbalanced_close() -> Self {
        TransitionError {
            kind: ParserErrorKind::UnbalancedClose,
            message: "unexpected ')'".to_string(),
        }
    }

    pub fn invalid_column(column: &str, valid: &[String]) -> Self {
        TransitionError {
            kind: ParserErrorKind::InvalidColumn,
            message: format!(
                "invalid column name: '{column}', valid values are: [{}]",
                valid.join(" ")
            ),
        }
    }

    pub fn complexity_exceeded(limit: u32) -> Self {
        TransitionError {
            kind: ParserErrorKind::ComplexityExceeded,
            message: format!("maximum number of permitted joins ({limit}) exceeded"),
        }
    }

    pub(crate) fn at_position(self, position: usize) -> ParserError {
        ParserError::AtPosition {
            position,
            kind: self.kind,
            message: self.message,
        }
    }
}

/// Errors that can occur while building a grammar or parsing a filter.
///
/// Every error raised while a token is being moved through the state
/// machine (`Syntax`, `UnbalancedClose`, `InvalidColumn`,
/// `ComplexityExceeded` — all surfaced here via the `AtPosition` variant)
/// is wrapped with the 1-based position of the token being processed at
/// the time, by the string-parser façade — this is the single wrapping
/// point, matching the Go source's `string_parser.Parse`.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("[{position}] error parsing the filter: {message}")]
    AtPosition {
        position: usize,
        kind: ParserErrorKind,
        message: String,
    },

    #[error("EOF encountered while parsing string")]
    PrematureEnd,

    #[error("EOF while searching for closing brace ')'")]
    UnbalancedOpenAtEof,

    #[error("invalid grammar: {source}")]
    InvalidGrammar {
        #[source]
        source: regex::Error,
    },
}

impl ParserError {
    pub fn kind(&self) -> ParserErrorKind {
        match self {
            ParserError::AtPosition { kind, .. } => *kind,
            ParserError::PrematureEnd => ParserErrorKind::PrematureEnd,
            ParserError::UnbalancedOpenAtEof => ParserErrorKind::UnbalancedOpenAtEof,
            ParserError::InvalidGrammar { .. } => ParserErrorKind::InvalidGrammar,
        }
    }

    /// The 1-based position of the offending token, when the error is
    /// positioned (everything but premature-end / invalid-grammar).
    pub fn position(&self) -> Option<usize> {
        match self {
            ParserError::AtPosition { position, .. } => Some(*position),
            _ => None,
        }
    }
}
