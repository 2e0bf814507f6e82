//! Generic, grammar-driven finite-state machine.
//!
//! This module is the innermost of the three layers described in the
//! crate's top-level docs: a directed graph of states, each with
//! per-edge acceptance predicates, exposing `transition`/`eof`. It knows
//! nothing about SQL, tokens, or scanners — those live in
//! [`crate::string_parser`] and [`crate::sql`].

mod builder;
mod state;

pub use builder::{StateDefinition, StateMachineBuilder, StateMachineDefinition, TransitionDefinition};
pub use state::{Acceptor, State, TransitionInterceptor, TransitionObserver, END_STATE, START_STATE};
