//! Fluent construction of a [`StringParser`] from a [`Grammar`], a
//! [`Scanner`], and a transition interceptor.

use crate::error::TransitionError;
use crate::state_machine::{StateMachineBuilder, State, TransitionInterceptor, TransitionObserver};

use super::grammar::Grammar;
use super::parser::StringParser;
use super::scanner::{Scanner, SimpleScanner};

/// Builds a [`StringParser`]. Defaults to the character-by-character
/// [`SimpleScanner`] when no scanner is supplied.
pub struct StringParserBuilder {
    grammar: Option<Grammar>,
    scanner: Box<dyn Scanner>,
    interceptor: Option<TransitionInterceptor<String, String>>,
    observers: Vec<TransitionObserver<String, String>>,
}

impl Default for StringParserBuilder {
    fn default() -> Self {
        StringParserBuilder {
            grammar: None,
            scanner: Box::new(SimpleScanner::new()),
            interceptor: None,
            observers: Vec::new(),
        }
    }
}

impl StringParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn with_scanner(mut self, scanner: Box<dyn Scanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_transition_interceptor(
        mut self,
        interceptor: impl Fn(&State<String, String>, &State<String, String>, &String) -> Result<(), TransitionError>
            + 'static,
    ) -> Self {
        self.interceptor = Some(std::rc::Rc::new(interceptor));
        self
    }

    pub fn with_transition_observer(
        mut self,
        observer: impl Fn(&State<String, String>, &State<String, String>, &String) + 'static,
    ) -> Self {
        self.observers.push(std::rc::Rc::new(observer));
        self
    }

    pub fn build(self) -> StringParser {
        let grammar = self.grammar.expect("StringParserBuilder requires a grammar");
        let mut builder = StateMachineBuilder::new(grammar.into_state_machine_definition());
        if let Some(interceptor) = self.interceptor {
            builder = builder.with_transition_interceptor(interceptor);
        }
        for observer in self.observers {
            builder = builder.with_transition_observer(observer);
        }

        StringParser {
            start_state: builder.build(),
            scanner: self.scanner,
        }
    }
}
