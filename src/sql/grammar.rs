//! The concrete SQL WHERE-clause grammar: token catalogue and legal
//! transitions for `IN`, `NOT IN`, `LIKE`, `ILIKE`, logical operators,
//! parentheses, and JSONB path operators.

use crate::error::ParserError;
use crate::state_machine::{END_STATE, START_STATE};
use crate::string_parser::{regexp_acceptor, string_acceptor, Grammar, TokenDefinition, TokenTransitions};

/// The metadata attached to each declared token: which family the SQL
/// interceptor dispatches on. Stored as the state's opaque `String` data
/// (see [`crate::string_parser::Grammar`]).
pub mod family {
    pub const BRACE: &str = "BRACE";
    pub const OP: &str = "OP";
    pub const LOGICAL: &str = "LOGICAL";
    pub const COLUMN: &str = "COLUMN";
    pub const VALUE: &str = "VALUE";
    pub const QUOTED_VALUE: &str = "QUOTED_VALUE";
    pub const JSONB: &str = "JSONB";
    pub const OTHERS: &str = "OTHERS";
}

mod token {
    pub const OPEN_BRACE: &str = "OPEN_BRACE";
    pub const CLOSED_BRACE: &str = "CLOSED_BRACE";
    pub const COLUMN: &str = "COLUMN";
    pub const VALUE: &str = "VALUE";
    pub const QUOTED_VALUE: &str = "QUOTED_VALUE";
    pub const EQ: &str = "EQ";
    pub const NOT_EQ: &str = "NOT_EQ";
    pub const GT: &str = "GREATER_THAN";
    pub const LT: &str = "LESS_THAN";
    pub const GTE: &str = "GREATER_THAN_OR_EQUAL";
    pub const LTE: &str = "LESS_THAN_OR_EQUAL";
    pub const LIKE: &str = "LIKE";
    pub const ILIKE: &str = "ILIKE";
    pub const IN: &str = "IN";
    pub const LIST_OPEN_BRACE: &str = "LIST_OPEN_BRACE";
    pub const QUOTED_VALUE_IN_LIST: &str = "QUOTED_VALUE_IN_LIST";
    pub const VALUE_IN_LIST: &str = "VALUE_IN_LIST";
    pub const COMMA: &str = "COMMA";
    pub const AND: &str = "AND";
    pub const OR: &str = "OR";
    pub const NOT: &str = "NOT";
    pub const JSONB_ARROW: &str = "JSONB_ARROW";
    pub const JSONB_FIELD: &str = "JSON_FIELD";
    pub const JSONB_TO_STRING: &str = "JSONB_TOSTRING";
    pub const JSONB_CONTAINS: &str = "JSONB_CONTAINS";
    pub const JSONB_FIELD_TO_STRINGIFY: &str = "JSONB_FIELD_TO_STRINGIFY";
}

/// Compiles the grammar for WHERE-clause filter expressions, matching
/// the token catalogue and transition table described in the crate's
/// design docs. Fails only if one of the built-in regex acceptors is
/// malformed, which would be a bug in this module rather than in caller
/// input.
pub fn basic_sql_grammar() -> Result<Grammar, ParserError> {
    use token::*;

    let tokens = vec![
        TokenDefinition { name: OPEN_BRACE.into(), data: family::BRACE.into(), acceptor: string_acceptor("(") },
        TokenDefinition { name: CLOSED_BRACE.into(), data: family::BRACE.into(), acceptor: string_acceptor(")") },
        TokenDefinition { name: COLUMN.into(), data: family::COLUMN.into(), acceptor: regexp_acceptor("(?i)[A-Z][A-Z0-9_.]*")? },
        TokenDefinition { name: VALUE.into(), data: family::VALUE.into(), acceptor: regexp_acceptor(r"[^'() ]*")? },
        TokenDefinition { name: QUOTED_VALUE.into(), data: family::QUOTED_VALUE.into(), acceptor: regexp_acceptor(r"'([^']|\\')*'")? },
        TokenDefinition { name: EQ.into(), data: family::OP.into(), acceptor: string_acceptor("=") },
        TokenDefinition { name: GT.into(), data: family::OP.into(), acceptor: string_acceptor(">") },
        TokenDefinition { name: LT.into(), data: family::OP.into(), acceptor: string_acceptor("<") },
        TokenDefinition { name: GTE.into(), data: family::OP.into(), acceptor: string_acceptor(">=") },
        TokenDefinition { name: LTE.into(), data: family::OP.into(), acceptor: string_acceptor("<=") },
        TokenDefinition { name: COMMA.into(), data: family::OTHERS.into(), acceptor: string_acceptor(",") },
        TokenDefinition { name: NOT_EQ.into(), data: family::OP.into(), acceptor: string_acceptor("<>") },
        TokenDefinition { name: LIKE.into(), data: family::OP.into(), acceptor: regexp_acceptor("(?i)LIKE")? },
        TokenDefinition { name: ILIKE.into(), data: family::OP.into(), acceptor: regexp_acceptor("(?i)ILIKE")? },
        TokenDefinition { name: IN.into(), data: family::OP.into(), acceptor: regexp_acceptor("(?i)IN")? },
        TokenDefinition { name: LIST_OPEN_BRACE.into(), data: family::BRACE.into(), acceptor: string_acceptor("(") },
        TokenDefinition { name: QUOTED_VALUE_IN_LIST.into(), data: family::QUOTED_VALUE.into(), acceptor: regexp_acceptor(r"'([^']|\\')*'")? },
        TokenDefinition { name: VALUE_IN_LIST.into(), data: family::VALUE.into(), acceptor: regexp_acceptor(r"[^'() ]*")? },
        TokenDefinition { name: AND.into(), data: family::LOGICAL.into(), acceptor: regexp_acceptor("(?i)AND")? },
        TokenDefinition { name: OR.into(), data: family::LOGICAL.into(), acceptor: regexp_acceptor("(?i)OR")? },
        TokenDefinition { name: NOT.into(), data: family::LOGICAL.into(), acceptor: regexp_acceptor("(?i)NOT")? },
        TokenDefinition { name: JSONB_ARROW.into(), data: family::JSONB.into(), acceptor: string_acceptor("->") },
        TokenDefinition { name: JSONB_FIELD.into(), data: family::JSONB.into(), acceptor: regexp_acceptor(r"'([^']|\\')*'")? },
        TokenDefinition { name: JSONB_TO_STRING.into(), data: family::JSONB.into(), acceptor: string_acceptor("->>") },
        TokenDefinition { name: JSONB_CONTAINS.into(), data: family::JSONB.into(), acceptor: string_acceptor("@>") },
        TokenDefinition { name: JSONB_FIELD_TO_STRINGIFY.into(), data: family::JSONB.into(), acceptor: regexp_acceptor(r"'([^']|\\')*'")? },
    ];

    let transitions = vec![
        TokenTransitions { token_name: START_STATE.into(), valid_transitions: vec![COLUMN.into(), OPEN_BRACE.into()] },
        TokenTransitions { token_name: OPEN_BRACE.into(), valid_transitions: vec![COLUMN.into(), OPEN_BRACE.into()] },
        TokenTransitions {
            token_name: COLUMN.into(),
            valid_transitions: vec![GT.into(), LT.into(), GTE.into(), LTE.into(), EQ.into(), NOT_EQ.into(), LIKE.into(), ILIKE.into(), IN.into(), NOT.into(), JSONB_ARROW.into()],
        },
        TokenTransitions { token_name: EQ.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: NOT_EQ.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: GT.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: LT.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: LTE.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: GTE.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: LIKE.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: ILIKE.into(), valid_transitions: vec![QUOTED_VALUE.into(), VALUE.into()] },
        TokenTransitions { token_name: QUOTED_VALUE.into(), valid_transitions: vec![OR.into(), AND.into(), CLOSED_BRACE.into(), END_STATE.into()] },
        TokenTransitions { token_name: VALUE.into(), valid_transitions: vec![OR.into(), AND.into(), CLOSED_BRACE.into(), END_STATE.into()] },
        TokenTransitions { token_name: CLOSED_BRACE.into(), valid_transitions: vec![OR.into(), AND.into(), CLOSED_BRACE.into(), END_STATE.into()] },
        TokenTransitions { token_name: AND.into(), valid_transitions: vec![COLUMN.into(), OPEN_BRACE.into()] },
        TokenTransitions { token_name: OR.into(), valid_transitions: vec![COLUMN.into(), OPEN_BRACE.into()] },
        TokenTransitions { token_name: NOT.into(), valid_transitions: vec![IN.into()] },
        TokenTransitions { token_name: IN.into(), valid_transitions: vec![LIST_OPEN_BRACE.into()] },
        TokenTransitions { token_name: LIST_OPEN_BRACE.into(), valid_transitions: vec![QUOTED_VALUE_IN_LIST.into(), VALUE_IN_LIST.into()] },
        TokenTransitions { token_name: QUOTED_VALUE_IN_LIST.into(), valid_transitions: vec![COMMA.into(), CLOSED_BRACE.into()] },
        TokenTransitions { token_name: VALUE_IN_LIST.into(), valid_transitions: vec![COMMA.into(), CLOSED_BRACE.into()] },
        TokenTransitions { token_name: COMMA.into(), valid_transitions: vec![QUOTED_VALUE_IN_LIST.into(), VALUE_IN_LIST.into()] },
        TokenTransitions { token_name: JSONB_ARROW.into(), valid_transitions: vec![JSONB_FIELD.into()] },
        TokenTransitions { token_name: JSONB_FIELD.into(), valid_transitions: vec![JSONB_ARROW.into(), JSONB_TO_STRING.into(), JSONB_CONTAINS.into()] },
        TokenTransitions { token_name: JSONB_TO_STRING.into(), valid_transitions: vec![JSONB_FIELD_TO_STRINGIFY.into()] },
        TokenTransitions {
            token_name: JSONB_FIELD_TO_STRINGIFY.into(),
            valid_transitions: vec![EQ.into(), NOT_EQ.into(), LIKE.into(), ILIKE.into(), IN.into(), NOT.into()],
        },
        TokenTransitions { token_name: JSONB_CONTAINS.into(), valid_transitions: vec![QUOTED_VALUE.into()] },
    ];

    Ok(Grammar { tokens, transitions })
}
