//! The generic finite-state-machine engine.
//!
//! A [`State`] is parameterized by two type variables, matching the Go
//! source this crate was distilled from: `T`, opaque metadata attached to
//! the state (the SQL parser uses it to carry a "token family"), and `U`,
//! the value that drives transitions. The engine itself never inspects
//! `T` and only ever compares `U` through the acceptor closures installed
//! on each state.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use crate::error::TransitionError;

/// Reserved name of the synthetic start state.
pub const START_STATE: &str = "__$$_START_$$__";
/// Reserved name of the synthetic end state.
pub const END_STATE: &str = "__$$_END_$$__";

/// Decides whether a candidate input can transition *into* the state it
/// is attached to.
pub type Acceptor<U> = Rc<dyn Fn(&U) -> bool>;

/// Invoked on every transition, before it is considered to have
/// happened. A non-`Ok` return short-circuits the move: no observers
/// fire and no transition occurs.
pub type TransitionInterceptor<T, U> =
    Rc<dyn Fn(&State<T, U>, &State<T, U>, &U) -> Result<(), TransitionError>>;

/// Fired after the interceptor has accepted a transition. Observers must
/// not mutate parser state and must not fail.
pub type TransitionObserver<T, U> = Rc<dyn Fn(&State<T, U>, &State<T, U>, &U)>;

/// A single node of the state machine.
pub struct State<T, U> {
    name: String,
    data: T,
    accept: Acceptor<U>,
    next: RefCell<Vec<Rc<State<T, U>>>>,
    last: Cell<bool>,
    is_eof: bool,
    on_transition: Option<TransitionInterceptor<T, U>>,
    observers: Vec<TransitionObserver<T, U>>,
}

impl<T, U> State<T, U>
where
    U: Display,
{
    /// The state's stable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opaque metadata attached to this state.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Attempts to move from this state given `value`. Successor states
    /// are tried in declaration order; the first whose acceptor returns
    /// `true` is chosen. If no successor accepts, the move fails with a
    /// syntax error carrying no position (the caller attaches one).
    pub fn transition(&self, value: &U) -> Result<Rc<State<T, U>>, TransitionError> {
        for next in self.next.borrow().iter() {
            if (next.accept)(value) {
                if let Some(interceptor) = &next.on_transition {
                    interceptor(self, next, value)?;
                }
                for observer in &self.observers {
                    observer(self, next, value);
                }
                return Ok(next.clone());
            }
        }
        Err(TransitionError::unexpected_token(&value.to_string()))
    }

    /// True if the stream may legally terminate in this state.
    pub fn eof(&self) -> bool {
        self.last.get()
    }
}

impl<T, U> State<T, U> {
    pub(crate) fn new(
        name: impl Into<String>,
        data: T,
        accept: Acceptor<U>,
        on_transition: Option<TransitionInterceptor<T, U>>,
        observers: Vec<TransitionObserver<T, U>>,
    ) -> Self {
        State {
            name: name.into(),
            data,
            accept,
            next: RefCell::new(Vec::new()),
            last: Cell::new(false),
            is_eof: false,
            on_transition,
            observers,
        }
    }

    pub(crate) fn start() -> Self
    where
        T: Default,
        U: 'static,
    {
        State {
            name: START_STATE.to_string(),
            data: T::default(),
            accept: Rc::new(|_: &U| false),
            next: RefCell::new(Vec::new()),
            last: Cell::new(false),
            is_eof: false,
            on_transition: None,
            observers: Vec::new(),
        }
    }

    pub(crate) fn end() -> Self
    where
        T: Default,
    {
        State {
            name: END_STATE.to_string(),
            data: T::default(),
            accept: Rc::new(|_: &U| false) as Acceptor<U>,
            next: RefCell::new(Vec::new()),
            last: Cell::new(false),
            is_eof: true,
            on_transition: None,
            observers: Vec::new(),
        }
    }

    /// Wires `next` as a successor. If `next` is the synthetic end
    /// state, `self` is marked terminal instead of storing the sentinel,
    /// matching the invariant that the end state is never stored in any
    /// adjacency list.
    pub(crate) fn add_next_state(&self, next: Rc<State<T, U>>) {
        if next.is_eof {
            self.last.set(true);
        } else {
            self.next.borrow_mut().push(next);
        }
    }
}
