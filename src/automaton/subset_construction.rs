//! Subset construction: lowering an NFA to an equivalent DFA.

use crate::automaton::dfa::Dfa;
use crate::automaton::label::Label;
use crate::automaton::nfa::Nfa;
use crate::automaton::state::{StateId, StateSet};
use indexmap::IndexMap;
use log::debug;

/// Convert `nfa` into a DFA whose states are the reachable epsilon-closed
/// subsets of the NFA's states.
///
/// The memoization key is the ascending identifier sequence of a closure
/// set, so two equal sets map to the same DFA state no matter how they were
/// produced. Termination follows from the finite number of distinct subsets.
pub(crate) fn subset_construction(nfa: &Nfa) -> Dfa {
    let start = nfa.ready();
    let capacity = nfa.num_states() as usize;

    let mut dfa = Dfa::new();
    let mut cache: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut worklist: Vec<(StateSet, StateId)> = Vec::new();

    let seed = nfa.epsilon_closure(&StateSet::singleton(start, capacity));
    let d0 = dfa.add_state();
    dfa.set_start(d0);
    if seed.intersects(nfa.accepts()) {
        dfa.add_accept(d0);
    }
    cache.insert(seed.to_vec(), d0);
    worklist.push((seed, d0));

    while let Some((current, from)) = worklist.pop() {
        // Bucket the labeled out-edges of the closure set by byte.
        let mut targets: IndexMap<u8, StateSet> = IndexMap::new();
        for state in current.iter() {
            for &(label, to) in nfa.edges(state) {
                if let Label::Byte(byte) = label {
                    targets
                        .entry(byte)
                        .or_insert_with(|| StateSet::with_capacity(capacity))
                        .insert(to);
                }
            }
        }

        for (byte, moved) in targets {
            let closure = nfa.epsilon_closure(&moved);
            let key = closure.to_vec();
            let to = match cache.get(&key) {
                Some(&existing) => existing,
                None => {
                    let fresh = dfa.add_state();
                    if closure.intersects(nfa.accepts()) {
                        dfa.add_accept(fresh);
                    }
                    cache.insert(key, fresh);
                    worklist.push((closure, fresh));
                    fresh
                }
            };
            dfa.add_edge(from, byte, to);
        }
    }

    debug!(
        "lowered {} NFA states to {} DFA states",
        nfa.num_states(),
        dfa.num_states()
    );
    dfa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nfa() -> Nfa {
        // Start s1, accept s5: s1-eps->s2, s1-a->s3, s2-a->s4, s2-a->s5,
        // s3-b->s4, s4-a->s5, s4-b->s5.
        let mut nfa = Nfa::new();
        let s1 = nfa.add_state();
        let s2 = nfa.add_state();
        let s3 = nfa.add_state();
        let s4 = nfa.add_state();
        let s5 = nfa.add_state();

        nfa.add_epsilon(s1, s2);
        nfa.add_edge(s1, Label::Byte(b'a'), s3);
        nfa.add_edge(s2, Label::Byte(b'a'), s4);
        nfa.add_edge(s2, Label::Byte(b'a'), s5);
        nfa.add_edge(s3, Label::Byte(b'b'), s4);
        nfa.add_edge(s4, Label::Byte(b'a'), s5);
        nfa.add_edge(s4, Label::Byte(b'b'), s5);

        nfa.set_start(s1);
        nfa.add_accept(s5);
        nfa
    }

    #[test]
    fn test_lower_agrees_with_simulation() {
        let nfa = sample_nfa();
        let dfa = nfa.lower();

        for input in [
            b"a".as_slice(),
            b"ab",
            b"abb",
            b"c",
            b"abbb",
            b"",
            b"aa",
            b"ba",
            b"aba",
            b"abba",
        ] {
            assert_eq!(
                nfa.simulate(input),
                dfa.simulate(input),
                "backends disagree on {input:?}"
            );
        }
    }

    #[test]
    fn test_lower_twice_same_language() {
        let nfa = sample_nfa();
        let first = nfa.lower();
        let second = nfa.lower();

        for input in [b"a".as_slice(), b"ab", b"abb", b"c", b"abbb", b"", b"bb"] {
            assert_eq!(first.simulate(input), second.simulate(input));
        }
    }

    #[test]
    fn test_equal_closure_sets_share_a_state() {
        // Two 'a' edges to distinct accepting states: the target sets merge
        // into one closure set, so the DFA needs exactly two states.
        let mut nfa = Nfa::new();
        let s0 = nfa.add_state();
        let s1 = nfa.add_state();
        let s2 = nfa.add_state();
        nfa.add_edge(s0, Label::Byte(b'a'), s1);
        nfa.add_edge(s0, Label::Byte(b'a'), s2);
        nfa.set_start(s0);
        nfa.add_accept(s1);
        nfa.add_accept(s2);

        let dfa = nfa.lower();
        assert_eq!(dfa.num_states(), 2);
        assert!(dfa.simulate(b"a"));
        assert!(!dfa.simulate(b"aa"));
    }

    #[test]
    fn test_epsilon_cycle_lowers() {
        // s0 and s1 form an epsilon cycle; 'a' loops back into it.
        let mut nfa = Nfa::new();
        let s0 = nfa.add_state();
        let s1 = nfa.add_state();
        nfa.add_epsilon(s0, s1);
        nfa.add_epsilon(s1, s0);
        nfa.add_edge(s1, Label::Byte(b'a'), s0);
        nfa.set_start(s0);
        nfa.add_accept(s1);

        let dfa = nfa.lower();
        assert!(dfa.simulate(b""));
        assert!(dfa.simulate(b"a"));
        assert!(dfa.simulate(b"aaa"));
        assert!(!dfa.simulate(b"b"));
    }

    #[test]
    fn test_accepting_seed_state() {
        // Start reaches an accept state through epsilon alone, so the DFA
        // start state must itself be accepting.
        let mut nfa = Nfa::new();
        let s0 = nfa.add_state();
        let s1 = nfa.add_state();
        nfa.add_epsilon(s0, s1);
        nfa.set_start(s0);
        nfa.add_accept(s1);

        let dfa = nfa.lower();
        assert!(dfa.simulate(b""));
        assert!(!dfa.simulate(b"a"));
    }
}
