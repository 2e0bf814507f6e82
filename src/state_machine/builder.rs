//! Declarative construction of a state machine from a
//! [`StateMachineDefinition`].

use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use super::state::{Acceptor, State, TransitionInterceptor, TransitionObserver, END_STATE, START_STATE};

/// One declared state: its name, attached data, and the acceptor that
/// decides whether a candidate input can move into it.
pub struct StateDefinition<T, U> {
    pub name: String,
    pub data: T,
    pub acceptor: Acceptor<U>,
}

/// The legal successors of a single named state.
pub struct TransitionDefinition {
    pub state_name: String,
    pub valid_transitions: Vec<String>,
}

/// A declarative, serializable description of a state machine: the set
/// of states plus the set of per-state transition lists. Every name
/// referenced in a transition list must be a declared state or one of
/// the two sentinels (`START_STATE`/`END_STATE`).
pub struct StateMachineDefinition<T, U> {
    pub states: Vec<StateDefinition<T, U>>,
    pub transitions: Vec<TransitionDefinition>,
}

/// Builds a [`StateMachineDefinition`] into a start-state handle,
/// injecting a single transition interceptor and observer list into
/// every declared state.
pub struct StateMachineBuilder<T, U> {
    definition: StateMachineDefinition<T, U>,
    interceptor: Option<TransitionInterceptor<T, U>>,
    observers: Vec<TransitionObserver<T, U>>,
}

impl<T, U> StateMachineBuilder<T, U>
where
    T: Default,
    U: Display + 'static,
{
    pub fn new(definition: StateMachineDefinition<T, U>) -> Self {
        StateMachineBuilder {
            definition,
            interceptor: None,
            observers: Vec::new(),
        }
    }

    pub fn with_transition_interceptor(mut self, handler: TransitionInterceptor<T, U>) -> Self {
        self.interceptor = Some(handler);
        self
    }

    pub fn with_transition_observer(mut self, observer: TransitionObserver<T, U>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the graph and returns the start state.
    pub fn build(self) -> Rc<State<T, U>> {
        let mut states: HashMap<String, Rc<State<T, U>>> = HashMap::new();
        states.insert(START_STATE.to_string(), Rc::new(State::start()));
        states.insert(END_STATE.to_string(), Rc::new(State::end()));

        for declared in self.definition.states {
            let state = State::new(
                declared.name.clone(),
                declared.data,
                declared.acceptor,
                self.interceptor.clone(),
                self.observers.clone(),
            );
            states.insert(declared.name, Rc::new(state));
        }

        for transition in &self.definition.transitions {
            let current = states
                .get(&transition.state_name)
                .unwrap_or_else(|| panic!("undeclared state `{}`", transition.state_name))
                .clone();
            for target_name in &transition.valid_transitions {
                let target = states
                    .get(target_name)
                    .unwrap_or_else(|| panic!("undeclared state `{target_name}`"))
                    .clone();
                current.add_next_state(target);
            }
        }

        states.get(START_STATE).unwrap().clone()
    }
}
