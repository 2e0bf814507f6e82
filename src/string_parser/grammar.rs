//! `Grammar` — a token-vocabulary-flavored alias over
//! [`StateMachineDefinition`], compiled once per [`super::StringParser`].

use crate::state_machine::{StateDefinition, StateMachineDefinition, TransitionDefinition};

/// One declared token: its name, the family tag stored as the state's
/// opaque data, and the acceptor that recognizes it.
pub type TokenDefinition = StateDefinition<String, String>;

/// The legal successor tokens of a single named token.
pub struct TokenTransitions {
    pub token_name: String,
    pub valid_transitions: Vec<String>,
}

/// A grammar: the token catalogue plus the transition table. This is
/// just a vocabulary-flavored alias of [`StateMachineDefinition`] — the
/// generic engine never sees "tokens", only states.
pub struct Grammar {
    pub tokens: Vec<TokenDefinition>,
    pub transitions: Vec<TokenTransitions>,
}

impl Grammar {
    pub(crate) fn into_state_machine_definition(self) -> StateMachineDefinition<String, String> {
        StateMachineDefinition {
            states: self.tokens,
            transitions: self
                .transitions
                .into_iter()
                .map(|t| TransitionDefinition {
                    state_name: t.token_name,
                    valid_transitions: t.valid_transitions,
                })
                .collect(),
        }
    }
}
