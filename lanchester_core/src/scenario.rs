//! Concrete scenarios: one fully resolved parameter set per run.

use crate::error::{LanchesterError, Result};
use crate::types::{ActivationOrder, Side};
use serde::{Deserialize, Serialize};

/// Parameters for one side of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideParams {
    /// Number of units at creation
    pub size: u32,

    /// Starting health of every unit
    pub health: u32,

    /// Per-enemy hit probability
    pub shot_prob: f64,

    /// Enemies evaluated per activation
    pub max_shots: u32,

    /// Live fraction at or below which the side withdraws
    pub retreat_threshold: f64,
}

impl SideParams {
    /// Checks the preconditions the combat engine relies on.
    pub fn validate(&self, side: Side) -> Result<()> {
        if self.size == 0 {
            return Err(LanchesterError::scenario(format!("{} force has no units", side)));
        }
        if self.health == 0 {
            return Err(LanchesterError::scenario(format!(
                "{} units start with zero health",
                side
            )));
        }
        if !(0.0..=1.0).contains(&self.shot_prob) {
            return Err(LanchesterError::scenario(format!(
                "{} shot probability {} is outside [0, 1]",
                side, self.shot_prob
            )));
        }
        if !(0.0..=1.0).contains(&self.retreat_threshold) {
            return Err(LanchesterError::scenario(format!(
                "{} retreat threshold {} is outside [0, 1]",
                side, self.retreat_threshold
            )));
        }
        Ok(())
    }

    /// Returns true if units on this side can ever damage the enemy.
    pub fn can_inflict_damage(&self) -> bool {
        self.shot_prob > 0.0 && self.max_shots > 0
    }
}

/// One concrete run configuration. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub activation_order: ActivationOrder,
    pub red: SideParams,
    pub blue: SideParams,
}

impl Scenario {
    /// Validates both sides.
    pub fn validate(&self) -> Result<()> {
        self.red.validate(Side::Red)?;
        self.blue.validate(Side::Blue)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | red {}x{}hp p={} shots={} rt={} | blue {}x{}hp p={} shots={} rt={}",
            self.activation_order,
            self.red.size,
            self.red.health,
            self.red.shot_prob,
            self.red.max_shots,
            self.red.retreat_threshold,
            self.blue.size,
            self.blue.health,
            self.blue.shot_prob,
            self.blue.max_shots,
            self.blue.retreat_threshold,
        )
    }
}
