//! A small regular-expression engine built around the classical pipeline:
//! expression combinators produce an NFA, the NFA is simulated directly or
//! lowered to a DFA by subset construction, and the DFA can be materialized
//! into native code by emitting C, compiling it into a shared library and
//! loading the result into the process.

pub mod automaton;
pub mod bench;
pub mod expr;
pub mod jit;

pub use automaton::{Dfa, Label, Nfa, StateId, StateSet};
pub use expr::Expr;
pub use jit::{JitError, JitMatcher};
