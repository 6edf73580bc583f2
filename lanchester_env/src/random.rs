//! Core randomness trait for the Lanchester simulator.

use crate::error::EnvError;

/// The central interface for stochastic decisions.
///
/// Implementations provide a single ordered stream: the order in which the
/// engine and the samplers call these methods is part of the reproducibility
/// contract, so callers must not reorder draws.
///
/// # Implementations
///
/// - **Simulation**: `SeededSource` - ChaCha8 stream from a 64-bit seed
/// - **Tests**: `ScriptedSource` - replays predetermined values
pub trait RandomSource {
    /// Returns a uniform real in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Returns a uniform index in `[0, n)`.
    ///
    /// # Panics
    /// Panics if `n == 0`; callers only ask for indices into non-empty pools.
    fn index(&mut self, n: usize) -> usize;

    /// Returns a uniformly shuffled permutation of `0..n`.
    fn permutation(&mut self, n: usize) -> Vec<usize>;

    /// Returns the seed that produced this stream (0 if not seeded).
    fn seed(&self) -> u64;

    /// Bernoulli trial: `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in `[low, high]`, both endpoints inclusive.
    fn int_inclusive(&mut self, low: u64, high: u64) -> Result<u64, EnvError> {
        if high < low {
            return Err(EnvError::EmptyRange { low, high });
        }
        let span = high - low;
        if span == u64::MAX {
            return Err(EnvError::EmptyRange { low, high });
        }
        let offset = self.index((span + 1) as usize) as u64;
        Ok(low + offset)
    }

    /// Uniform real in `[low, high)`. A degenerate interval yields `low`.
    fn real(&mut self, low: f64, high: f64) -> Result<f64, EnvError> {
        if !low.is_finite() || !high.is_finite() || high < low {
            return Err(EnvError::InvalidInterval { low, high });
        }
        if high == low {
            return Ok(low);
        }
        Ok(low + (high - low) * self.next_f64())
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn index(&mut self, n: usize) -> usize {
        (**self).index(n)
    }

    fn permutation(&mut self, n: usize) -> Vec<usize> {
        (**self).permutation(n)
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }

    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }

    fn int_inclusive(&mut self, low: u64, high: u64) -> Result<u64, EnvError> {
        (**self).int_inclusive(low, high)
    }

    fn real(&mut self, low: f64, high: f64) -> Result<f64, EnvError> {
        (**self).real(low, high)
    }
}
