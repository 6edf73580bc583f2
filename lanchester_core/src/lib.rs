//! Lanchester Core - stochastic attrition combat and parameter exploration
//!
//! Two forces ("red" and "blue") of identical units shoot at each other
//! until one or both fall to their retreat threshold. This crate holds:
//!
//! - **Force Model** (`force`): units, rosters, casualty removal
//! - **Combat Engine** (`engine`): activation scheduling, shot actions,
//!   adjudication
//! - **Scenarios** (`scenario`, `range`, `config`): concrete parameter sets,
//!   `(low, high, step)` ranges and the JSON scenario template
//! - **Exploration** (`sweep`, `monte_carlo`): factorial sweeps and random
//!   sampling over a template
//!
//! All randomness comes from a [`lanchester_env::RandomSource`] passed in by
//! the caller.
//!
//! # Example
//!
//! ```
//! use lanchester_core::{ActivationOrder, CombatEngine, Force};
//! use lanchester_env::SeededSource;
//!
//! let mut red = Force::new(20, 1, 2, 0.3, 0.3);
//! let mut blue = Force::new(20, 1, 2, 0.3, 0.3);
//! let mut rng = SeededSource::new(42);
//!
//! let resolution = CombatEngine::new(&mut rng)
//!     .resolve(&mut red, &mut blue, ActivationOrder::RandomSynchronous)
//!     .unwrap();
//! assert!(resolution.outcome.is_terminal());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod force;
pub mod monte_carlo;
pub mod range;
pub mod scenario;
pub mod sweep;
pub mod types;

pub use config::{ScenarioTemplate, SideRanges};
pub use engine::{adjudicate, shoot, CasualtyEvent, CombatEngine, Resolution};
pub use error::{LanchesterError, Result};
pub use force::{Force, Unit};
pub use monte_carlo::MonteCarloSampler;
pub use range::{DimensionRange, RangeValue};
pub use scenario::{Scenario, SideParams};
pub use sweep::{CartesianProduct, SweepPlan, SweepValues};
pub use types::{ActivationOrder, BatchMode, Outcome, Side};
