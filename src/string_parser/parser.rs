//! The string-parser façade: feeds scanner tokens to the state machine
//! and reports positioned errors.

use std::rc::Rc;

use crate::error::ParserError;
use crate::state_machine::State;

use super::scanner::Scanner;

/// Binds a built state machine to a [`Scanner`] and drives a full parse.
pub struct StringParser {
    pub(super) start_state: Rc<State<String, String>>,
    pub(super) scanner: Box<dyn Scanner>,
}

impl StringParser {
    /// Feeds `text` through the scanner and the state machine. Returns
    /// an error wrapped with the 1-based position of the token being
    /// processed when a move fails, or when the stream ends in a
    /// non-terminal state.
    pub fn parse(&mut self, text: &str) -> Result<(), ParserError> {
        self.scanner.init(text);
        let mut state = self.start_state.clone();

        while self.scanner.next() {
            let token = self.scanner.token();
            match state.transition(&token.value) {
                Ok(next) => state = next,
                Err(err) => return Err(err.at_position(token.position + 1)),
            }
        }

        if !state.eof() {
            return Err(ParserError::PrematureEnd);
        }

        Ok(())
    }
}
