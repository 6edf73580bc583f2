//! Tagged enumerations shared by the engine, the samplers and the sinks.
//!
//! Each enum owns its textual form (`name()`, `Display`, `FromStr`, serde),
//! so no code depends on a numeric encoding.

use serde::{Deserialize, Serialize};

/// Turn-scheduling policy for the combat engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationOrder {
    /// Pool-many draws with replacement, casualties resolved at end of turn
    RandomSynchronous,

    /// One permutation of all units per turn, casualties at end of turn
    UniformSynchronous,

    /// Draws with replacement, casualties resolved after every shot
    RandomAsynchronous,

    /// Currently scheduled exactly like `RandomAsynchronous`
    UniformAsynchronous,
}

impl ActivationOrder {
    /// Returns all activation orders.
    pub fn all() -> Vec<ActivationOrder> {
        vec![
            ActivationOrder::RandomSynchronous,
            ActivationOrder::UniformSynchronous,
            ActivationOrder::RandomAsynchronous,
            ActivationOrder::UniformAsynchronous,
        ]
    }

    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationOrder::RandomSynchronous => "random-synchronous",
            ActivationOrder::UniformSynchronous => "uniform-synchronous",
            ActivationOrder::RandomAsynchronous => "random-asynchronous",
            ActivationOrder::UniformAsynchronous => "uniform-asynchronous",
        }
    }

    /// Returns true if casualties are removed after every shot.
    pub fn is_asynchronous(&self) -> bool {
        matches!(
            self,
            ActivationOrder::RandomAsynchronous | ActivationOrder::UniformAsynchronous
        )
    }
}

impl std::fmt::Display for ActivationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ActivationOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "random-synchronous" | "random-sync" => Ok(ActivationOrder::RandomSynchronous),
            "uniform-synchronous" | "uniform-sync" => Ok(ActivationOrder::UniformSynchronous),
            "random-asynchronous" | "random-async" => Ok(ActivationOrder::RandomAsynchronous),
            "uniform-asynchronous" | "uniform-async" => Ok(ActivationOrder::UniformAsynchronous),
            _ => Err(format!("Unknown activation order: {}", s)),
        }
    }
}

/// Result of adjudicating the two forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Neither side has breached its retreat threshold
    Incomplete,
    RedVictory,
    BlueVictory,
    /// Both sides breached in the same adjudication
    Tie,
}

impl Outcome {
    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Incomplete => "incomplete",
            Outcome::RedVictory => "red-victory",
            Outcome::BlueVictory => "blue-victory",
            Outcome::Tie => "tie",
        }
    }

    /// Returns true for every outcome that ends a run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Incomplete)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Exploration strategy for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// One run from the low end of every range
    #[default]
    #[serde(alias = "single-run")]
    Single,

    /// Full factorial sweep
    #[serde(alias = "parameter-sweep")]
    Sweep,

    /// Independent uniform draws from every range
    #[serde(alias = "montecarlo")]
    MonteCarlo,

    /// Reserved; always rejected
    LatinHypercube,
}

impl BatchMode {
    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            BatchMode::Single => "single",
            BatchMode::Sweep => "sweep",
            BatchMode::MonteCarlo => "monte-carlo",
            BatchMode::LatinHypercube => "latin-hypercube",
        }
    }
}

impl std::fmt::Display for BatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One of the two opposing forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blue,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Blue => write!(f, "blue"),
        }
    }
}
