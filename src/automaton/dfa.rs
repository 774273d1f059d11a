//! Deterministic Finite Automaton (DFA).

use crate::automaton::label::Label;
use crate::automaton::state::{StateId, StateSet};
use indexmap::IndexMap;
use std::fmt;

/// A deterministic finite automaton over the byte alphabet.
///
/// Each state owns a byte-to-target map in insertion order, so `(state,
/// byte)` is a function; inserting a second target for the same byte is a
/// bug in the caller.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<IndexMap<u8, StateId>>,
    start: Option<StateId>,
    accepts: StateSet,
}

impl Dfa {
    /// Create a new empty DFA.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh state with no outgoing edges and return its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(IndexMap::new());
        id
    }

    /// Record the start state. The last write wins until matching begins.
    pub fn set_start(&mut self, state: StateId) {
        assert!(
            (state as usize) < self.states.len(),
            "start state {state} does not exist"
        );
        self.start = Some(state);
    }

    /// Mark a state as accepting. Marking the same state twice is a bug.
    pub fn add_accept(&mut self, state: StateId) {
        assert!(
            (state as usize) < self.states.len(),
            "accept state {state} does not exist"
        );
        assert!(
            !self.accepts.contains(state),
            "state {state} is already accepting"
        );
        self.accepts.insert(state);
    }

    /// Insert the unique edge for `(from, byte)`.
    pub fn add_edge(&mut self, from: StateId, byte: u8, to: StateId) {
        assert!(
            (from as usize) < self.states.len(),
            "edge source {from} does not exist"
        );
        assert!(
            (to as usize) < self.states.len(),
            "edge target {to} does not exist"
        );
        let prev = self.states[from as usize].insert(byte, to);
        assert!(
            prev.is_none(),
            "duplicate edge from state {from} on {}",
            Label::Byte(byte)
        );
    }

    /// Get the number of states.
    pub fn num_states(&self) -> StateId {
        self.states.len() as StateId
    }

    /// Get the start state, if one has been set.
    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// Get the accepting states.
    pub fn accepts(&self) -> &StateSet {
        &self.accepts
    }

    /// Outgoing edges of a state, in insertion order.
    pub fn edges(&self, state: StateId) -> &IndexMap<u8, StateId> {
        &self.states[state as usize]
    }

    /// Follow the transition for `(state, byte)`, if one is defined.
    pub fn transition(&self, state: StateId, byte: u8) -> Option<StateId> {
        self.states[state as usize].get(&byte).copied()
    }

    /// Walk the state table over `input`.
    ///
    /// A byte with no outgoing edge rejects immediately; otherwise accepts
    /// iff the walk ends on an accepting state.
    pub fn simulate(&self, input: &[u8]) -> bool {
        let mut state = self.ready();

        for &byte in input {
            match self.transition(state, byte) {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.accepts.contains(state)
    }

    /// Write the textual dump to stdout.
    pub fn print(&self) {
        print!("{self}");
    }

    fn ready(&self) -> StateId {
        assert!(!self.states.is_empty(), "automaton has no states");
        assert!(!self.accepts.is_empty(), "automaton has no accepting states");
        self.start.expect("automaton has no start state")
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, edges) in self.states.iter().enumerate() {
            let id = id as StateId;
            super::fmt_state_header(f, id, self.start, &self.accepts)?;
            for (&byte, &to) in edges {
                writeln!(f, "    {} -> {to}", Label::Byte(byte))?;
            }
        }
        Ok(())
    }
}
