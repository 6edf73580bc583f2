//! Lanchester Environment Abstraction Layer
//!
//! Every stochastic decision the simulator makes (activation draws,
//! permutations, Bernoulli shots, Monte Carlo samples) goes through the
//! [`RandomSource`] trait defined here. Engines never touch a global RNG.
//!
//! # Core Concept: One Stream
//!
//! A session consumes a single, globally ordered stream of draws. Given the
//! same seed and the same sequence of operations, a whole exploration session
//! replays bit-for-bit:
//! - **Seeded**: [`SeededSource`] wraps a ChaCha8 stream derived from a `u64`
//! - **Scripted**: [`ScriptedSource`] replays fixed draws for exact tests
//!
//! # Example
//!
//! ```
//! use lanchester_env::{RandomSource, SeededSource};
//!
//! let mut rng = SeededSource::new(42);
//! let order = rng.permutation(5);
//! assert_eq!(order.len(), 5);
//! ```

mod error;
mod random;
mod scripted;
mod seeded;

pub use error::EnvError;
pub use random::RandomSource;
pub use scripted::ScriptedSource;
pub use seeded::SeededSource;
