//! Units and forces.
//!
//! A [`Force`] is a dense, ordered roster of identical [`Unit`]s plus the
//! attributes frozen at creation. Storage order matters only for which
//! enemies a shooter evaluates first and for the positions reported by
//! casualty removal.

use crate::scenario::SideParams;

/// The smallest combat entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Probability that one evaluated enemy is hit
    pub shot_prob: f64,

    /// Remaining hit points; the unit is a casualty at `<= 0`
    pub health: i64,

    /// Number of enemies evaluated per activation
    pub max_shots: u32,
}

impl Unit {
    /// Creates a unit at full health.
    pub fn new(shot_prob: f64, health: u32, max_shots: u32) -> Self {
        Self {
            shot_prob,
            health: i64::from(health),
            max_shots,
        }
    }

    /// Returns true while the unit has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A side's roster and its frozen attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Force {
    units: Vec<Unit>,
    force_size: usize,
    retreat_threshold: f64,
    shot_prob: f64,
    health: u32,
    max_shots: u32,
}

impl Force {
    /// Creates `size` identical units.
    pub fn new(
        size: usize,
        health: u32,
        max_shots: u32,
        shot_prob: f64,
        retreat_threshold: f64,
    ) -> Self {
        Self {
            units: vec![Unit::new(shot_prob, health, max_shots); size],
            force_size: size,
            retreat_threshold,
            shot_prob,
            health,
            max_shots,
        }
    }

    /// Creates a force from one side of a scenario.
    pub fn from_params(params: &SideParams) -> Self {
        Self::new(
            params.size as usize,
            params.health,
            params.max_shots,
            params.shot_prob,
            params.retreat_threshold,
        )
    }

    /// Live units in storage order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    /// Current number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Original unit count, frozen at creation.
    pub fn force_size(&self) -> usize {
        self.force_size
    }

    pub fn retreat_threshold(&self) -> f64 {
        self.retreat_threshold
    }

    pub fn shot_prob(&self) -> f64 {
        self.shot_prob
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_shots(&self) -> u32 {
        self.max_shots
    }

    /// Live fraction of the original force.
    pub fn surviving_fraction(&self) -> f64 {
        if self.force_size == 0 {
            return 0.0;
        }
        self.units.len() as f64 / self.force_size as f64
    }

    /// Returns true once the live fraction is at or below the threshold.
    pub fn has_breached(&self) -> bool {
        self.surviving_fraction() <= self.retreat_threshold
    }

    /// Removes every unit with `health <= 0`.
    ///
    /// Returns the storage positions (as they were before this call) of the
    /// removed units. Survivors keep their relative order.
    pub fn remove_casualties(&mut self) -> Vec<usize> {
        let mut removed = Vec::new();
        let mut position = 0;
        self.units.retain(|unit| {
            let alive = unit.is_alive();
            if !alive {
                removed.push(position);
            }
            position += 1;
            alive
        });
        removed
    }
}

impl std::fmt::Display for Force {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} units, each with maximum health {}, a {} kill probability, and a retreat threshold of {}",
            self.units.len(),
            self.force_size,
            self.health,
            self.shot_prob,
            self.retreat_threshold
        )
    }
}
