//! Finite-automaton data model.
//!
//! Shared state and label types, the NFA and DFA shapes with their
//! simulators, and the subset-construction lowering between them.

mod dfa;
mod label;
mod nfa;
mod state;
mod subset_construction;

pub use dfa::Dfa;
pub use label::Label;
pub use nfa::Nfa;
pub use state::{StateId, StateSet};

use std::fmt;

/// Header line of the textual dump shared by both automaton shapes: the
/// identifier plus `(start)`/`(match)` annotations.
pub(crate) fn fmt_state_header(
    f: &mut fmt::Formatter<'_>,
    id: StateId,
    start: Option<StateId>,
    accepts: &StateSet,
) -> fmt::Result {
    write!(f, "State {id}")?;
    if start == Some(id) {
        write!(f, " (start)")?;
    }
    if accepts.contains(id) {
        write!(f, " (match)")?;
    }
    writeln!(f)
}
