//! Expression combinators that build NFAs.

use crate::automaton::{Label, Nfa, StateId};
use std::fmt;

/// A regular expression over single bytes.
///
/// The closed variant set covers the supported surface: a literal byte,
/// concatenation, alternation, zero-or-one, and one-or-more. Each variant
/// knows how to lift itself into a fresh NFA; none of the produced automata
/// are minimal, subset construction removes the epsilon slack later.
#[derive(Debug, Clone)]
pub enum Expr {
    Byte(u8),
    Concat(Box<Expr>, Box<Expr>),
    Alt(Box<Expr>, Box<Expr>),
    Opt(Box<Expr>),
    Plus(Box<Expr>),
}

impl Expr {
    /// A single literal byte.
    pub fn byte(b: u8) -> Expr {
        Expr::Byte(b)
    }

    /// `a` followed by `b`.
    pub fn concat(a: Expr, b: Expr) -> Expr {
        Expr::Concat(Box::new(a), Box::new(b))
    }

    /// Either `a` or `b`.
    pub fn alt(a: Expr, b: Expr) -> Expr {
        Expr::Alt(Box::new(a), Box::new(b))
    }

    /// Zero or one occurrence of `a`.
    pub fn opt(a: Expr) -> Expr {
        Expr::Opt(Box::new(a))
    }

    /// One or more occurrences of `a`.
    pub fn plus(a: Expr) -> Expr {
        Expr::Plus(Box::new(a))
    }

    /// Build a fresh NFA recognizing this expression, with a single start
    /// state and the accept shape of the variant.
    pub fn to_nfa(&self) -> Nfa {
        match *self {
            Expr::Byte(b) => {
                let mut nfa = Nfa::new();
                let start = nfa.add_state();
                let accept = nfa.add_state();
                nfa.set_start(start);
                nfa.add_accept(accept);
                nfa.add_edge(start, Label::Byte(b), accept);
                nfa
            }
            Expr::Concat(ref a, ref b) => {
                let mut nfa = Nfa::new();
                let start = nfa.add_state();
                nfa.set_start(start);
                let mid = merge(&mut nfa, start, &a.to_nfa());
                let exit = merge(&mut nfa, mid, &b.to_nfa());
                nfa.add_accept(exit);
                nfa
            }
            Expr::Alt(ref a, ref b) => {
                let mut nfa = Nfa::new();
                let start = nfa.add_state();
                nfa.set_start(start);
                let exit_a = merge(&mut nfa, start, &a.to_nfa());
                let exit_b = merge(&mut nfa, start, &b.to_nfa());
                nfa.add_accept(exit_a);
                nfa.add_accept(exit_b);
                nfa
            }
            Expr::Opt(ref a) => {
                let mut nfa = Nfa::new();
                let start = nfa.add_state();
                nfa.set_start(start);
                let exit = merge(&mut nfa, start, &a.to_nfa());
                nfa.add_accept(exit);
                nfa.add_epsilon(start, exit);
                nfa
            }
            Expr::Plus(ref a) => {
                let mut nfa = Nfa::new();
                let start = nfa.add_state();
                nfa.set_start(start);
                let exit = merge(&mut nfa, start, &a.to_nfa());
                nfa.add_accept(exit);
                nfa.add_epsilon(exit, start);
                nfa
            }
        }
    }
}

/// Splice `src` into `dst`, hanging its entry off `anchor`.
///
/// Renumbers every `src` state into `dst`, reproduces its edges under the
/// new numbering, connects `anchor` to the renumbered start by epsilon, and
/// funnels every former `src` accept state into one fresh exit state by
/// epsilon. Returns the exit; nothing is marked accepting in `dst`.
pub fn merge(dst: &mut Nfa, anchor: StateId, src: &Nfa) -> StateId {
    // Fresh ids are dense, so the renumbering is a constant offset.
    let offset = dst.num_states();
    for _ in 0..src.num_states() {
        dst.add_state();
    }
    for state in 0..src.num_states() {
        for &(label, to) in src.edges(state) {
            dst.add_edge(offset + state, label, offset + to);
        }
    }

    let src_start = src.start().expect("spliced automaton has no start state");
    dst.add_epsilon(anchor, offset + src_start);

    let exit = dst.add_state();
    for accept in src.accepts().iter() {
        dst.add_epsilon(offset + accept, exit);
    }
    exit
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Expr::Byte(b) => fmt_byte(f, b),
            Expr::Concat(ref a, ref b) => {
                fmt_concat_operand(f, a)?;
                fmt_concat_operand(f, b)
            }
            Expr::Alt(ref a, ref b) => write!(f, "{a}|{b}"),
            Expr::Opt(ref a) => {
                fmt_postfix_operand(f, a)?;
                f.write_str("?")
            }
            Expr::Plus(ref a) => {
                fmt_postfix_operand(f, a)?;
                f.write_str("+")
            }
        }
    }
}

/// Alternation binds loosest, so it needs parentheses inside a
/// concatenation.
fn fmt_concat_operand(f: &mut fmt::Formatter<'_>, operand: &Expr) -> fmt::Result {
    if matches!(*operand, Expr::Alt(..)) {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

/// A postfix operator binds tighter than everything but a literal.
fn fmt_postfix_operand(f: &mut fmt::Formatter<'_>, operand: &Expr) -> fmt::Result {
    if matches!(*operand, Expr::Byte(_)) {
        write!(f, "{operand}")
    } else {
        write!(f, "({operand})")
    }
}

fn fmt_byte(f: &mut fmt::Formatter<'_>, b: u8) -> fmt::Result {
    match b {
        b'.' | b'^' | b'$' | b'*' | b'+' | b'?' | b'(' | b')' | b'[' | b']' | b'{' | b'}'
        | b'|' | b'\\' => write!(f, "\\{}", b as char),
        _ if b.is_ascii_graphic() || b == b' ' => write!(f, "{}", b as char),
        _ => write!(f, "\\x{b:02x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a(bb)+a
    fn sample_expr() -> Expr {
        Expr::concat(
            Expr::concat(
                Expr::byte(b'a'),
                Expr::plus(Expr::concat(Expr::byte(b'b'), Expr::byte(b'b'))),
            ),
            Expr::byte(b'a'),
        )
    }

    fn accepts(expr: &Expr, input: &[u8]) -> bool {
        expr.to_nfa().simulate(input)
    }

    #[test]
    fn test_byte_shape() {
        let nfa = Expr::byte(b'x').to_nfa();
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.start(), Some(0));
        assert!(nfa.simulate(b"x"));
        assert!(!nfa.simulate(b""));
        assert!(!nfa.simulate(b"xx"));
    }

    #[test]
    fn test_merge_returns_fresh_exit() {
        let mut dst = Nfa::new();
        let anchor = dst.add_state();
        dst.set_start(anchor);

        let exit = merge(&mut dst, anchor, &Expr::byte(b'a').to_nfa());
        assert_eq!(exit, dst.num_states() - 1);
        assert!(dst.accepts().is_empty());

        dst.add_accept(exit);
        assert!(dst.simulate(b"a"));
        assert!(!dst.simulate(b"b"));
    }

    #[test]
    fn test_concat_associativity() {
        let left = Expr::concat(
            Expr::concat(Expr::byte(b'a'), Expr::byte(b'b')),
            Expr::byte(b'c'),
        );
        let right = Expr::concat(
            Expr::byte(b'a'),
            Expr::concat(Expr::byte(b'b'), Expr::byte(b'c')),
        );

        for input in [b"abc".as_slice(), b"ab", b"ac", b"abcc", b"", b"cba"] {
            assert_eq!(accepts(&left, input), accepts(&right, input));
        }
        assert!(accepts(&left, b"abc"));
    }

    #[test]
    fn test_alt_is_union() {
        let expr = Expr::alt(Expr::byte(b'a'), Expr::byte(b'b'));
        assert!(accepts(&expr, b"a"));
        assert!(accepts(&expr, b"b"));
        assert!(!accepts(&expr, b"c"));
        assert!(!accepts(&expr, b"ab"));
        assert!(!accepts(&expr, b""));
    }

    #[test]
    fn test_opt_adds_empty() {
        let expr = Expr::opt(Expr::byte(b'a'));
        assert!(accepts(&expr, b""));
        assert!(accepts(&expr, b"a"));
        assert!(!accepts(&expr, b"aa"));
    }

    #[test]
    fn test_plus_is_one_or_more() {
        let expr = Expr::plus(Expr::byte(b'a'));
        assert!(!accepts(&expr, b""));
        assert!(accepts(&expr, b"a"));
        assert!(accepts(&expr, b"aa"));
        assert!(accepts(&expr, b"aaaa"));
        assert!(!accepts(&expr, b"ab"));
    }

    #[test]
    fn test_sample_scenario() {
        let expr = sample_expr();
        let nfa = expr.to_nfa();
        let dfa = nfa.lower();

        let cases: &[(&[u8], bool)] = &[
            (b"aa", false),
            (b"aba", false),
            (b"abba", true),
            (b"abbba", false),
            (b"abbbba", true),
        ];
        for &(input, expected) in cases {
            assert_eq!(nfa.simulate(input), expected, "NFA on {input:?}");
            assert_eq!(dfa.simulate(input), expected, "DFA on {input:?}");
        }
    }

    #[test]
    fn test_display_patterns() {
        assert_eq!(sample_expr().to_string(), "a(bb)+a");
        assert_eq!(
            Expr::concat(
                Expr::alt(Expr::byte(b'a'), Expr::byte(b'b')),
                Expr::opt(Expr::byte(b'c')),
            )
            .to_string(),
            "(a|b)c?"
        );
        assert_eq!(Expr::byte(b'+').to_string(), "\\+");
    }

    #[test]
    fn test_verdicts_agree_with_regex_crate() {
        let exprs = [
            sample_expr(),
            Expr::concat(
                Expr::alt(Expr::byte(b'a'), Expr::byte(b'b')),
                Expr::plus(Expr::byte(b'c')),
            ),
            Expr::opt(Expr::alt(Expr::byte(b'x'), Expr::byte(b'y'))),
        ];
        let inputs: &[&[u8]] = &[
            b"", b"a", b"b", b"c", b"x", b"y", b"ac", b"bc", b"accc", b"abba", b"abbba",
            b"abbbba", b"xy", b"blah",
        ];

        for expr in &exprs {
            let oracle = regex::bytes::Regex::new(&format!("^(?:{expr})$")).unwrap();
            let nfa = expr.to_nfa();
            for input in inputs {
                assert_eq!(
                    nfa.simulate(input),
                    oracle.is_match(input),
                    "oracle disagrees on {expr} over {input:?}"
                );
            }
        }
    }
}
