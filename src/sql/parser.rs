//! Rewrites a WHERE-clause filter expression into a parameterized query
//! plus its ordered bind values, by installing a transition interceptor
//! on the generic [`crate::string_parser::StringParser`] built from
//! [`super::grammar::basic_sql_grammar`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ParserError, TransitionError};
use crate::state_machine::State;
use crate::string_parser::{StringParser, StringParserBuilder};

use super::grammar::{basic_sql_grammar, family};
use super::scanner::SqlScanner;

const DEFAULT_MAXIMUM_COMPLEXITY: u32 = 10;

#[derive(Default)]
struct ParseState {
    complexity: u32,
    open_braces: i32,
    result_query: String,
    result_values: Vec<String>,
}

/// Builder-style options for [`new_sql_parser`].
#[derive(Default)]
pub struct SqlParserOptions {
    valid_columns: Vec<String>,
    column_prefix: String,
    maximum_complexity: Option<u32>,
}

impl SqlParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts accepted columns to this allow-list. An empty list (the
    /// default) permits any column matching the grammar's identifier
    /// pattern.
    pub fn with_valid_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Prefixes every column not already under `prefix` with
    /// `prefix.`. Leading/trailing spaces are trimmed; an all-whitespace
    /// prefix disables prefixing entirely.
    pub fn with_column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = prefix.into().trim().to_string();
        self
    }

    /// Caps the number of logical joins (`AND`/`OR`/`NOT`) a single
    /// filter may contain. Defaults to 10.
    pub fn with_maximum_complexity(mut self, limit: u32) -> Self {
        self.maximum_complexity = Some(limit);
        self
    }
}

/// Parses and rewrites WHERE-clause filter expressions. Not `Sync`/`Send`:
/// build one per thread, or behind a mutex.
pub struct SqlParser {
    parser: StringParser,
    state: Rc<RefCell<ParseState>>,
}

/// Builds a [`SqlParser`] from the built-in SQL grammar.
pub fn new_sql_parser(options: SqlParserOptions) -> Result<SqlParser, ParserError> {
    let state = Rc::new(RefCell::new(ParseState::default()));
    let interceptor_state = state.clone();
    let maximum_complexity = options.maximum_complexity.unwrap_or(DEFAULT_MAXIMUM_COMPLEXITY);
    let valid_columns = options.valid_columns;
    let column_prefix = options.column_prefix;

    let interceptor = move |_from: &State<String, String>, to: &State<String, String>, token_value: &String| {
        let mut state = interceptor_state.borrow_mut();

        match to.data().as_str() {
            family::BRACE => {
                match token_value.as_str() {
                    "(" => state.open_braces += 1,
                    ")" => state.open_braces -= 1,
                    _ => {}
                }
                if state.open_braces < 0 {
                    return Err(TransitionError::unbalanced_close());
                }
                state.result_query.push_str(token_value);
                Ok(())
            }
            family::VALUE => {
                state.result_query.push_str(" ?");
                state.result_values.push(token_value.clone());
                Ok(())
            }
            family::QUOTED_VALUE => {
                state.result_query.push_str(" ?");
                let unescaped = token_value.replace("\\'", "'");
                let unquoted = if unescaped.chars().count() > 1 {
                    let chars: Vec<char> = unescaped.chars().collect();
                    chars[1..chars.len() - 1].iter().collect()
                } else {
                    unescaped
                };
                state.result_values.push(unquoted);
                Ok(())
            }
            family::LOGICAL => {
                state.complexity += 1;
                if state.complexity > maximum_complexity {
                    return Err(TransitionError::complexity_exceeded(maximum_complexity));
                }
                state.result_query.push(' ');
                state.result_query.push_str(token_value);
                state.result_query.push(' ');
                Ok(())
            }
            family::COLUMN => {
                let column_name = token_value.to_lowercase();
                if !valid_columns.is_empty() && !valid_columns.iter().any(|c| c == &column_name) {
                    return Err(TransitionError::invalid_column(token_value, &valid_columns));
                }
                let prefixed = if !column_prefix.is_empty() && !column_name.starts_with(&format!("{column_prefix}.")) {
                    format!("{column_prefix}.{column_name}")
                } else {
                    column_name
                };
                state.result_query.push_str(&prefixed);
                Ok(())
            }
            // JSONB path operators/fields and the remaining comparison
            // operators pass through verbatim, space-separated.
            _ => {
                state.result_query.push(' ');
                state.result_query.push_str(token_value);
                Ok(())
            }
        }
    };

    let grammar = basic_sql_grammar()?;
    let parser = StringParserBuilder::new()
        .with_grammar(grammar)
        .with_scanner(Box::new(SqlScanner::new()))
        .with_transition_interceptor(interceptor)
        .build();

    Ok(SqlParser { parser, state })
}

impl SqlParser {
    /// Parses `filter`, returning the rewritten query (with `?`
    /// placeholders) and its ordered bind values.
    #[tracing::instrument(skip(self, filter), fields(len = filter.len()))]
    pub fn parse(&mut self, filter: &str) -> Result<(String, Vec<String>), ParserError> {
        tracing::debug!("parsing filter expression");
        *self.state.borrow_mut() = ParseState::default();

        if let Err(err) = self.parser.parse(filter) {
            tracing::warn!(position = ?err.position(), kind = ?err.kind(), "filter rejected");
            return Err(err);
        }

        let mut state = self.state.borrow_mut();
        if state.open_braces > 0 {
            tracing::warn!("filter rejected: unbalanced open brace at eof");
            return Err(ParserError::UnbalancedOpenAtEof);
        }
        let result_query = state.result_query.trim().to_string();
        Ok((result_query, std::mem::take(&mut state.result_values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SqlParser {
        new_sql_parser(SqlParserOptions::new()).expect("default grammar compiles")
    }

    #[test]
    fn just_equals_sign_is_a_syntax_error() {
        let err = parser().parse("=").unwrap_err();
        assert_eq!(err.to_string(), "[1] error parsing the filter: unexpected token `=`");
    }

    #[test]
    fn incomplete_query_is_premature_end() {
        let err = parser().parse("name=").unwrap_err();
        assert_eq!(err.to_string(), "EOF encountered while parsing string");
    }

    #[test]
    fn incomplete_join_is_premature_end() {
        let err = parser().parse("name='test' and ").unwrap_err();
        assert_eq!(err.to_string(), "EOF encountered while parsing string");
    }

    #[test]
    fn escaped_quote_is_unescaped_in_the_bind_value() {
        let (qry, values) = parser().parse(r"name='test\'123'").unwrap();
        assert_eq!(qry, "name = ?");
        assert_eq!(values, vec!["test'123"]);
    }

    #[test]
    fn wrong_unescaped_quote_is_a_syntax_error() {
        let err = parser().parse("name='test'123'").unwrap_err();
        assert_eq!(err.to_string(), "[12] error parsing the filter: unexpected token `123`");
    }

    #[test]
    fn quoted_parenthesis_is_kept_inside_the_value() {
        let (qry, values) = parser().parse("name='test(123)'").unwrap();
        assert_eq!(qry, "name = ?");
        assert_eq!(values, vec!["test(123)"]);
    }

    #[test]
    fn in_keyword_rewrites_each_list_element() {
        let (qry, values) = parser().parse("name IN ('value1', 'value2')").unwrap();
        assert_eq!(qry, "name IN( ? , ?)");
        assert_eq!(values, vec!["value1", "value2"]);
    }

    #[test]
    fn in_with_no_values_is_a_syntax_error() {
        let err = parser().parse("name IN ()").unwrap_err();
        assert_eq!(err.to_string(), "[10] error parsing the filter: unexpected token `)`");
    }

    #[test]
    fn in_complex_query() {
        let (qry, values) = parser()
            .parse(
                "((cloud_provider = Value and name = value1) and (owner <> value2 or region=b ) \
                 or owner in ('owner1', 'owner2', 'owner3')) or owner=c or name=e and region LIKE '%test%' \
                 and instance_type=standard",
            )
            .unwrap();
        assert_eq!(
            qry,
            "((cloud_provider = ? and name = ?) and (owner <> ? or region = ?) or owner in( ? , ? , ?)) \
             or owner = ? or name = ? and region LIKE ? and instance_type = ?"
        );
        assert_eq!(
            values,
            vec!["Value", "value1", "value2", "b", "owner1", "owner2", "owner3", "c", "e", "%test%", "standard"]
        );
    }

    #[test]
    fn negated_in_keyword_double_spaces_and_counts_as_complexity() {
        let (qry, values) = parser()
            .parse(
                "((cloud_provider = Value and name = value1) and (owner <> value2 or region=b ) \
                 or owner not in ('owner1', 'owner2', 'owner3')) or owner=c or name=e and region LIKE '%test%'",
            )
            .unwrap();
        assert_eq!(
            qry,
            "((cloud_provider = ? and name = ?) and (owner <> ? or region = ?) or owner not  in( ? , ? , ?)) \
             or owner = ? or name = ? and region LIKE ?"
        );
        assert_eq!(values, vec!["Value", "value1", "value2", "b", "owner1", "owner2", "owner3", "c", "e", "%test%"]);
    }

    #[test]
    fn jsonb_path_is_passed_through_and_terminal_value_is_bound() {
        let (qry, values) = parser().parse("manifest->'data'->'manifest'->'metadata'->'labels'->>'foo' = 'bar'").unwrap();
        assert_eq!(qry, "manifest -> 'data' -> 'manifest' -> 'metadata' -> 'labels' ->> 'foo' = ?");
        assert_eq!(values, vec!["bar"]);
    }

    #[test]
    fn jsonb_contains_operator() {
        let (qry, values) = parser()
            .parse(r#"resources.payload -> 'data' -> 'manifests' @> '[{"metadata":{"labels":{"foo":"bar"}}}]'"#)
            .unwrap();
        assert_eq!(qry, "resources.payload -> 'data' -> 'manifests' @> ?");
        assert_eq!(values, vec![r#"[{"metadata":{"labels":{"foo":"bar"}}}]"#]);
    }

    #[test]
    fn unclosed_brace_is_an_eof_error() {
        let err = parser().parse("(name = 'value1'").unwrap_err();
        assert_eq!(err.to_string(), "EOF while searching for closing brace ')'");
    }

    #[test]
    fn maximum_complexity_is_enforced() {
        let mut p = new_sql_parser(SqlParserOptions::new().with_maximum_complexity(3)).unwrap();
        let err = p
            .parse("((cloud_provider = Value and name = value1) and (owner <> value2 or region=b ) ) or owner=c or name=e and region LIKE '%test%'")
            .unwrap_err();
        assert_eq!(err.to_string(), "[82] error parsing the filter: maximum number of permitted joins (3) exceeded");
    }

    #[test]
    fn valid_columns_rejects_unlisted_columns() {
        let mut p = new_sql_parser(SqlParserOptions::new().with_valid_columns(["cloud_provider", "name", "region"])).unwrap();
        let err = p
            .parse("((cloud_provider = Value and name = value1) and (owner <> value2 or region=b ) ) or owner=c or name=e and region LIKE '%test%'")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "[50] error parsing the filter: invalid column name: 'owner', valid values are: [cloud_provider name region]"
        );
    }

    #[test]
    fn column_prefix_is_applied_and_all_whitespace_prefix_is_ignored() {
        let mut p = new_sql_parser(SqlParserOptions::new().with_column_prefix("main")).unwrap();
        let (qry, _) = p.parse("cloud_provider = Value and name = value1").unwrap();
        assert_eq!(qry, "main.cloud_provider = ? and main.name = ?");

        let mut p = new_sql_parser(SqlParserOptions::new().with_column_prefix("   ")).unwrap();
        let (qry, _) = p.parse("cloud_provider = Value").unwrap();
        assert_eq!(qry, "cloud_provider = ?");
    }
}
