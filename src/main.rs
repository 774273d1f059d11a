//! Demo binary: the engine's two hard-coded scenarios, asserted and
//! benchmarked on all three backends.

use rejit::bench::Benchmark;
use rejit::{Expr, JitError, JitMatcher, Label, Nfa};

const BENCH_COUNT: usize = 1_000_000;
const BENCH_SEED: u64 = 0;

fn main() -> Result<(), JitError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    basic_scenario()?;
    regex_scenario()?;
    Ok(())
}

/// Run every backend over the same benchmark inputs; the three match counts
/// must agree.
fn run_backends(bench: &Benchmark, nfa: &Nfa) -> Result<usize, JitError> {
    println!("NFA");
    nfa.print();
    let nfa_count = bench.run("NFA simulation", |input| nfa.simulate(input));

    let dfa = nfa.lower();
    println!("DFA");
    dfa.print();
    let dfa_count = bench.run("DFA simulation", |input| dfa.simulate(input));

    let jit = JitMatcher::compile(&dfa)?;
    let jit_count = bench.run("JIT", |input| jit.is_match(input));

    assert_eq!(nfa_count, dfa_count, "DFA count diverged from NFA");
    assert_eq!(dfa_count, jit_count, "JIT count diverged from DFA");
    println!("{nfa_count} matches per backend");
    Ok(nfa_count)
}

fn basic_scenario() -> Result<(), JitError> {
    println!("--------------------------");
    println!("Hand-built NFA");

    let vocabulary: &[&[u8]] = &[
        b"aba",
        b"abb",
        b"abbb",
        b"aa",
        b"ab",
        b"a",
        b"aaa",
        b"aab",
        b"baa",
        b"bba",
        b"bbb",
        b"ba",
        b"bb",
        b"b",
        b"c",
        b"blah blah blah",
        b"abaracadabara",
    ];
    let bench = Benchmark::new(vocabulary, BENCH_COUNT, BENCH_SEED);

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

    assert!(nfa.simulate(b"a"));
    assert!(nfa.simulate(b"ab"));
    assert!(nfa.simulate(b"abb"));
    assert!(!nfa.simulate(b"c"));
    assert!(!nfa.simulate(b"abbb"));

    run_backends(&bench, &nfa)?;
    Ok(())
}

fn regex_scenario() -> Result<(), JitError> {
    println!("--------------------------");
    println!("Regex a(bb)+a");

    let vocabulary: &[&[u8]] = &[
        b"aa",
        b"aba",
        b"abba",
        b"abbba",
        b"abbbba",
        b"abbbbbbbbbbbbbbbbbbbba",
        b"abbbbbbbbbbbbbbbbbba",
        b"blah blah blah",
        b"abaracadabara",
        b"crapola",
    ];
    let bench = Benchmark::new(vocabulary, BENCH_COUNT, BENCH_SEED);

    let expr = Expr::concat(
        Expr::concat(
            Expr::byte(b'a'),
            Expr::plus(Expr::concat(Expr::byte(b'b'), Expr::byte(b'b'))),
        ),
        Expr::byte(b'a'),
    );
    println!("Pattern: {expr}");

    let nfa = expr.to_nfa();
    assert!(!nfa.simulate(b"aa"));
    assert!(!nfa.simulate(b"aba"));
    assert!(nfa.simulate(b"abba"));
    assert!(!nfa.simulate(b"abbba"));
    assert!(nfa.simulate(b"abbbba"));

    run_backends(&bench, &nfa)?;
    Ok(())
}
