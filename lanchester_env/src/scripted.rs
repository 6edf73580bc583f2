//! Scripted random source for exact, hand-checked engine tests.

use crate::random::RandomSource;
use std::collections::VecDeque;

/// Replays predetermined draws in order.
///
/// Each draw kind has its own queue. When a queue runs dry the source falls
/// back to a fixed value: `fallback_real` for reals, `0` for indices and the
/// identity ordering for permutations. Draw counters let tests assert how
/// many times the engine consulted the stream.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    reals: VecDeque<f64>,
    indices: VecDeque<usize>,
    permutations: VecDeque<Vec<usize>>,
    fallback_real: f64,
    reals_drawn: usize,
    indices_drawn: usize,
}

impl ScriptedSource {
    /// Creates an empty script (every real draw returns `0.0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues real draws.
    pub fn with_reals(mut self, reals: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(reals);
        self
    }

    /// Queues index draws.
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// Queues one permutation.
    pub fn with_permutation(mut self, order: Vec<usize>) -> Self {
        self.permutations.push_back(order);
        self
    }

    /// Sets the value returned once the real queue is exhausted.
    pub fn with_fallback_real(mut self, value: f64) -> Self {
        self.fallback_real = value;
        self
    }

    /// Number of real draws consumed so far.
    pub fn reals_drawn(&self) -> usize {
        self.reals_drawn
    }

    /// Number of index draws consumed so far.
    pub fn indices_drawn(&self) -> usize {
        self.indices_drawn
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        self.reals_drawn += 1;
        self.reals.pop_front().unwrap_or(self.fallback_real)
    }

    fn index(&mut self, n: usize) -> usize {
        self.indices_drawn += 1;
        self.indices.pop_front().map_or(0, |i| i % n)
    }

    fn permutation(&mut self, n: usize) -> Vec<usize> {
        match self.permutations.pop_front() {
            Some(order) if order.len() == n => order,
            _ => (0..n).collect(),
        }
    }

    fn seed(&self) -> u64 {
        0
    }
}
