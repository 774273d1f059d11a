//! Deterministic benchmark driver.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Logs the wall-clock time of a scope when dropped.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        info!(
            "{}: {:.3} ms elapsed",
            self.label,
            self.start.elapsed().as_secs_f64() * 1e3
        );
    }
}

/// A fixed list of inputs sampled with replacement from a small vocabulary.
///
/// Sampling uses a seeded generator, so the same seed always materializes
/// the same sequence and every backend sees identical work.
pub struct Benchmark {
    inputs: Vec<Vec<u8>>,
}

impl Benchmark {
    pub fn new(vocabulary: &[&[u8]], count: usize, seed: u64) -> Self {
        assert!(!vocabulary.is_empty(), "benchmark needs a nonempty vocabulary");
        let mut rng = StdRng::seed_from_u64(seed);
        let inputs = (0..count)
            .map(|_| vocabulary[rng.gen_range(0..vocabulary.len())].to_vec())
            .collect();
        Self { inputs }
    }

    /// Run `matcher` over every input under a scoped timer and return the
    /// match count.
    pub fn run(&self, label: &str, mut matcher: impl FnMut(&[u8]) -> bool) -> usize {
        let _timer = ScopedTimer::new(label);
        self.inputs
            .iter()
            .filter(|input| matcher(input.as_slice()))
            .count()
    }

    pub fn inputs(&self) -> &[Vec<u8>] {
        &self.inputs
    }
}
