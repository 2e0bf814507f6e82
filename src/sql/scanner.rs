//! The SQL-filter scanner: a character-class tokenizer with quoting
//! rules, multi-character operators, brace/comma handling, and JSONB
//! arrows.

use crate::string_parser::{Scanner, Token};

/// Scanner-private token class tags.
pub const OP: i32 = 0;
pub const BRACE: i32 = 1;
pub const LITERAL: i32 = 2;
pub const QUOTED_LITERAL: i32 = 3;
const NO_TOKEN: i32 = 4;

/// Splits a WHERE-clause-shaped string into whole words or quoted
/// literals, gluing multi-character operators (`->`, `->>`, `@>`, `<>`,
/// `<=`, `>=`) and treating `(`/`)` as standalone brace tokens.
pub struct SqlScanner {
    tokens: Vec<Token>,
    pos: isize,
}

impl Default for SqlScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlScanner {
    pub fn new() -> Self {
        SqlScanner {
            tokens: Vec::new(),
            pos: -1,
        }
    }
}

/// One micro-token accumulated while scanning; flushed into a single
/// [`Token`] once a character of a different class is seen.
struct Accumulator {
    token_type: i32,
    value: String,
    start: usize,
}

impl Scanner for SqlScanner {
    fn init(&mut self, text: &str) {
        self.pos = -1;
        self.tokens = Vec::new();

        let mut acc: Option<Accumulator> = None;
        let mut quoted = false;
        let mut escaped = false;

        let flush = |acc: &mut Option<Accumulator>, tokens: &mut Vec<Token>| {
            if let Some(a) = acc.take() {
                if !a.value.is_empty() {
                    tokens.push(Token {
                        token_type: a.token_type,
                        value: a.value,
                        position: a.start,
                    });
                }
            }
        };

        let push = |acc: &mut Option<Accumulator>, token_type: i32, c: char, pos: usize| {
            match acc {
                Some(a) => a.value.push(c),
                None => {
                    *acc = Some(Accumulator {
                        token_type,
                        value: c.to_string(),
                        start: pos,
                    })
                }
            }
        };

        for (i, c) in text.char_indices() {
            if quoted {
                if c == '\'' {
                    push(&mut acc, QUOTED_LITERAL, c, i);
                    if !escaped {
                        flush(&mut acc, &mut self.tokens);
                        quoted = false;
                    }
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                    push(&mut acc, QUOTED_LITERAL, c, i);
                } else {
                    push(&mut acc, LITERAL, c, i);
                }
                continue;
            }

            match c {
                ' ' => flush(&mut acc, &mut self.tokens),
                ',' => {
                    flush(&mut acc, &mut self.tokens);
                    self.tokens.push(Token {
                        token_type: LITERAL,
                        value: ",".to_string(),
                        position: i,
                    });
                }
                '\'' => {
                    flush(&mut acc, &mut self.tokens);
                    quoted = true;
                    push(&mut acc, QUOTED_LITERAL, c, i);
                }
                '\\' => {
                    if !matches!(acc.as_ref().map(|a| a.token_type), None | Some(LITERAL) | Some(QUOTED_LITERAL)) {
                        flush(&mut acc, &mut self.tokens);
                    }
                    push(&mut acc, LITERAL, c, i);
                }
                '@' | '-' | '=' | '<' | '>' => {
                    if !matches!(acc.as_ref().map(|a| a.token_type), Some(OP)) {
                        flush(&mut acc, &mut self.tokens);
                    }
                    push(&mut acc, OP, c, i);
                }
                '(' | ')' => {
                    flush(&mut acc, &mut self.tokens);
                    self.tokens.push(Token {
                        token_type: BRACE,
                        value: c.to_string(),
                        position: i,
                    });
                }
                _ => {
                    if !matches!(acc.as_ref().map(|a| a.token_type), None | Some(LITERAL) | Some(QUOTED_LITERAL)) {
                        flush(&mut acc, &mut self.tokens);
                    }
                    push(&mut acc, LITERAL, c, i);
                }
            }
        }

        flush(&mut acc, &mut self.tokens);
        let _ = NO_TOKEN;
    }

    fn next(&mut self) -> bool {
        if self.pos + 1 < self.tokens.len() as isize {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn token(&self) -> &Token {
        assert!(self.pos >= 0, "invalid scanner position {}", self.pos);
        &self.tokens[self.pos as usize]
    }

    fn peek(&self) -> Option<Token> {
        let next_idx = self.pos + 1;
        if (next_idx as usize) < self.tokens.len() {
            Some(self.tokens[next_idx as usize].clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> Vec<Token> {
        let mut scanner = SqlScanner::new();
        scanner.init(input);
        let mut tokens = Vec::new();
        while scanner.next() {
            tokens.push(scanner.token().clone());
        }
        tokens
    }

    fn tok(token_type: i32, value: &str, position: usize) -> Token {
        Token { token_type, value: value.to_string(), position }
    }

    #[test]
    fn simple_select() {
        assert_eq!(
            scan_all("SELECT * FROM TABLE_NAME"),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "TABLE_NAME", 14),
            ]
        );
    }

    #[test]
    fn quoted_string_with_spaces() {
        assert_eq!(
            scan_all("SELECT * FROM ADDRESS_BOOK WHERE SURNAME = 'surname with spaces'"),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "ADDRESS_BOOK", 14),
                tok(LITERAL, "WHERE", 27),
                tok(LITERAL, "SURNAME", 33),
                tok(OP, "=", 41),
                tok(QUOTED_LITERAL, "'surname with spaces'", 43),
            ]
        );
    }

    #[test]
    fn quoted_string_including_a_comma() {
        assert_eq!(
            scan_all("SELECT * FROM ADDRESS_BOOK WHERE SURNAME = 'surname with , comma'"),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "ADDRESS_BOOK", 14),
                tok(LITERAL, "WHERE", 27),
                tok(LITERAL, "SURNAME", 33),
                tok(OP, "=", 41),
                tok(QUOTED_LITERAL, "'surname with , comma'", 43),
            ]
        );
    }

    #[test]
    fn quoted_string_including_an_open_parenthesis() {
        assert_eq!(
            scan_all("SELECT * FROM ADDRESS_BOOK WHERE SURNAME = 'surname with ( parenthesis'"),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "ADDRESS_BOOK", 14),
                tok(LITERAL, "WHERE", 27),
                tok(LITERAL, "SURNAME", 33),
                tok(OP, "=", 41),
                tok(QUOTED_LITERAL, "'surname with ( parenthesis'", 43),
            ]
        );
    }

    #[test]
    fn quoted_string_with_escaped_chars() {
        assert_eq!(
            scan_all(r#"SELECT * FROM ADDRESS_BOOK WHERE SURNAME = 'surname with spaces and \'quote\''"#),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "ADDRESS_BOOK", 14),
                tok(LITERAL, "WHERE", 27),
                tok(LITERAL, "SURNAME", 33),
                tok(OP, "=", 41),
                tok(QUOTED_LITERAL, r#"'surname with spaces and \'quote\''"#, 43),
            ]
        );
    }

    #[test]
    fn sql_with_operators() {
        assert_eq!(
            scan_all("SELECT * FROM ADDRESS_BOOK WHERE SURNAME = 'Mouse' AND AGE > 3"),
            vec![
                tok(LITERAL, "SELECT", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "FROM", 9),
                tok(LITERAL, "ADDRESS_BOOK", 14),
                tok(LITERAL, "WHERE", 27),
                tok(LITERAL, "SURNAME", 33),
                tok(OP, "=", 41),
                tok(QUOTED_LITERAL, "'Mouse'", 43),
                tok(LITERAL, "AND", 51),
                tok(LITERAL, "AGE", 55),
                tok(OP, ">", 59),
                tok(LITERAL, "3", 61),
            ]
        );
    }

    #[test]
    fn empty_parenthesis() {
        assert_eq!(
            scan_all("name IN ()"),
            vec![
                tok(LITERAL, "name", 0),
                tok(LITERAL, "IN", 5),
                tok(BRACE, "(", 8),
                tok(BRACE, ")", 9),
            ]
        );
    }

    #[test]
    fn list_values() {
        assert_eq!(
            scan_all("value1, 'value2', 'value3', value4"),
            vec![
                tok(LITERAL, "value1", 0),
                tok(LITERAL, ",", 6),
                tok(QUOTED_LITERAL, "'value2'", 8),
                tok(LITERAL, ",", 16),
                tok(QUOTED_LITERAL, "'value3'", 18),
                tok(LITERAL, ",", 26),
                tok(LITERAL, "value4", 28),
            ]
        );
    }

    #[test]
    fn quoted_string_with_special_characters() {
        assert_eq!(
            scan_all(r#"name = '@,\'""(){}/'"#),
            vec![
                tok(LITERAL, "name", 0),
                tok(OP, "=", 5),
                tok(QUOTED_LITERAL, r#"'@,\'""(){}/'"#, 7),
            ]
        );
    }

    #[test]
    fn jsonb_path() {
        assert_eq!(
            scan_all(
                "select * from table where manifest->'data'->'manifest'->'metadata'->'labels'->>'foo' = 'bar'"
            ),
            vec![
                tok(LITERAL, "select", 0),
                tok(LITERAL, "*", 7),
                tok(LITERAL, "from", 9),
                tok(LITERAL, "table", 14),
                tok(LITERAL, "where", 20),
                tok(LITERAL, "manifest", 26),
                tok(OP, "->", 34),
                tok(QUOTED_LITERAL, "'data'", 36),
                tok(OP, "->", 42),
                tok(QUOTED_LITERAL, "'manifest'", 44),
                tok(OP, "->", 54),
                tok(QUOTED_LITERAL, "'metadata'", 56),
                tok(OP, "->", 66),
                tok(QUOTED_LITERAL, "'labels'", 68),
                tok(OP, "->>", 76),
                tok(QUOTED_LITERAL, "'foo'", 79),
                tok(OP, "=", 85),
                tok(QUOTED_LITERAL, "'bar'", 87),
            ]
        );
    }

    #[test]
    fn jsonb_contains_token() {
        assert_eq!(
            scan_all(
                r#"resources.payload -> 'data' -> 'manifests' @> '[{"metadata":{"labels":{"foo":"bar"}}}]'"#
            ),
            vec![
                tok(LITERAL, "resources.payload", 0),
                tok(OP, "->", 18),
                tok(QUOTED_LITERAL, "'data'", 21),
                tok(OP, "->", 28),
                tok(QUOTED_LITERAL, "'manifests'", 31),
                tok(OP, "@>", 43),
                tok(QUOTED_LITERAL, r#"'[{"metadata":{"labels":{"foo":"bar"}}}]'"#, 46),
            ]
        );
    }

    #[test]
    fn peek_returns_the_next_token_without_moving() {
        let mut scanner = SqlScanner::new();
        scanner.init("name = 'x'");
        assert!(scanner.next());
        let peeked = scanner.peek().expect("one more token");
        assert_eq!(peeked.value, "=");
        assert_eq!(scanner.token().value, "name");
    }

    #[test]
    fn peek_returns_none_at_end_of_stream() {
        let mut scanner = SqlScanner::new();
        scanner.init("name");
        assert!(scanner.next());
        assert!(scanner.peek().is_none());
    }
}
