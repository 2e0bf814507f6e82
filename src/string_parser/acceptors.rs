//! Default acceptor constructors shared by every grammar.

use std::rc::Rc;

use regex::Regex;

use crate::error::ParserError;
use crate::state_machine::Acceptor;

/// Accepts exactly one literal string.
pub fn string_acceptor(literal: impl Into<String>) -> Acceptor<String> {
    let literal = literal.into();
    Rc::new(move |value: &String| *value == literal)
}

/// Accepts values matched by `pattern`, anchored at both ends. `^`/`$`
/// are prepended/appended if not already present, so anchoring is
/// idempotent and partial matches are always rejected.
pub fn regexp_acceptor(pattern: &str) -> Result<Acceptor<String>, ParserError> {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }

    let regex = Regex::new(&anchored).map_err(|source| ParserError::InvalidGrammar { source })?;
    Ok(Rc::new(move |value: &String| regex.is_match(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_acceptor_matches_only_the_exact_literal() {
        let accept = string_acceptor("AND");
        assert!(accept(&"AND".to_string()));
        assert!(!accept(&"and".to_string()));
        assert!(!accept(&"AND2".to_string()));
    }

    #[test]
    fn regexp_acceptor_anchors_both_ends() {
        let accept = regexp_acceptor("[A-Z][A-Z0-9_.]*").expect("valid regex");
        assert!(accept(&"COLUMN_NAME".to_string()));
        assert!(!accept(&"not a column".to_string()));
        assert!(!accept(&"COLUMN_NAME;DROP".to_string()));
    }

    #[test]
    fn regexp_acceptor_anchoring_is_idempotent() {
        let a = regexp_acceptor("^AND$").expect("valid regex");
        let b = regexp_acceptor("AND").expect("valid regex");
        assert_eq!(a(&"AND".to_string()), b(&"AND".to_string()));
        assert_eq!(a(&"ANDX".to_string()), b(&"ANDX".to_string()));
    }

    #[test]
    fn regexp_acceptor_rejects_invalid_patterns() {
        let err = regexp_acceptor("(unclosed").err().unwrap();
        assert!(matches!(err, ParserError::InvalidGrammar { .. }));
    }
}
