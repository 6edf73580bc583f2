//! Full factorial parameter sweeps.
//!
//! A [`SweepPlan`] turns a [`ScenarioTemplate`] into an ordered list of
//! dimensions, each with a value count, and walks their Cartesian product
//! lazily. Dimension order (outermost first):
//!
//! 1. activation order
//! 2. red size, health, shot probability, max shots, retreat threshold
//! 3. blue size, health, shot probability, max shots, retreat threshold
//!
//! Each combination is then repeated `niter` times, so run indices are
//! reproducible for a given template.

use crate::config::{ScenarioTemplate, SideRanges};
use crate::error::{LanchesterError, Result};
use crate::scenario::{Scenario, SideParams};
use crate::types::ActivationOrder;

/// Dimension names in iteration order.
pub const DIMENSIONS: [&str; 11] = [
    "activation-order",
    "red-size",
    "red-health",
    "red-shot-prob",
    "red-max-shots",
    "red-retreat-threshold",
    "blue-size",
    "blue-health",
    "blue-shot-prob",
    "blue-max-shots",
    "blue-retreat-threshold",
];

/// Odometer over per-dimension radices. The last dimension varies fastest.
///
/// Yields nothing if any radix is zero and exactly one empty index for zero
/// dimensions.
#[derive(Debug, Clone)]
pub struct CartesianProduct {
    radices: Vec<u64>,
    next: Option<Vec<u64>>,
}

impl CartesianProduct {
    pub fn new(radices: Vec<u64>) -> Self {
        let next = if radices.iter().any(|r| *r == 0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Self { radices, next }
    }
}

impl Iterator for CartesianProduct {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut following = current.clone();
        for dim in (0..self.radices.len()).rev() {
            following[dim] += 1;
            if following[dim] < self.radices[dim] {
                self.next = Some(following);
                break;
            }
            following[dim] = 0;
        }

        Some(current)
    }
}

/// Expanded values of one side's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct SideValues {
    pub size: Vec<u32>,
    pub health: Vec<u32>,
    pub shot_prob: Vec<f64>,
    pub max_shots: Vec<u32>,
    pub retreat_threshold: Vec<f64>,
}

impl SideValues {
    fn expand(ranges: &SideRanges) -> Result<Self> {
        Ok(Self {
            size: ranges.size.values()?,
            health: ranges.health.values()?,
            shot_prob: ranges.shot_prob.values()?,
            max_shots: ranges.max_shots.values()?,
            retreat_threshold: ranges.retreat_threshold.values()?,
        })
    }
}

/// Explicit per-dimension value lists of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepValues {
    pub activation_orders: Vec<ActivationOrder>,
    pub red: SideValues,
    pub blue: SideValues,
}

/// A sized, ordered sweep over a template.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    activation_orders: Vec<ActivationOrder>,
    red: SideRanges,
    blue: SideRanges,
    niter: u32,
    radices: Vec<u64>,
    combinations: u64,
    total_runs: u64,
}

impl SweepPlan {
    /// Sizes the sweep. Fails if the run count overflows `u64`.
    pub fn new(template: &ScenarioTemplate) -> Result<Self> {
        template.validate()?;

        let mut radices = vec![template.activation_orders.len() as u64];
        for side in [&template.red, &template.blue] {
            radices.push(side.size.count()?);
            radices.push(side.health.count()?);
            radices.push(side.shot_prob.count()?);
            radices.push(side.max_shots.count()?);
            radices.push(side.retreat_threshold.count()?);
        }

        let combinations = radices
            .iter()
            .try_fold(1u64, |acc, r| acc.checked_mul(*r))
            .ok_or(LanchesterError::SweepTooLarge)?;
        let total_runs = combinations
            .checked_mul(u64::from(template.niter))
            .ok_or(LanchesterError::SweepTooLarge)?;

        Ok(Self {
            activation_orders: template.activation_orders.clone(),
            red: template.red.clone(),
            blue: template.blue.clone(),
            niter: template.niter,
            radices,
            combinations,
            total_runs,
        })
    }

    /// Runs the sweep will execute, `niter` repetitions included.
    pub fn total_runs(&self) -> u64 {
        self.total_runs
    }

    /// Distinct scenarios in the sweep.
    pub fn combinations(&self) -> u64 {
        self.combinations
    }

    /// Value count per dimension, in [`DIMENSIONS`] order.
    pub fn dimension_counts(&self) -> &[u64] {
        &self.radices
    }

    /// Materialises every dimension's values.
    pub fn values(&self) -> Result<SweepValues> {
        Ok(SweepValues {
            activation_orders: self.activation_orders.clone(),
            red: SideValues::expand(&self.red)?,
            blue: SideValues::expand(&self.blue)?,
        })
    }

    /// Scenario at one odometer position.
    pub fn scenario_at(&self, index: &[u64]) -> Scenario {
        Scenario {
            activation_order: self.activation_orders[index[0] as usize],
            red: side_at(&self.red, &index[1..6]),
            blue: side_at(&self.blue, &index[6..11]),
        }
    }

    /// Every distinct scenario, in sweep order.
    pub fn combinations_iter(&self) -> impl Iterator<Item = Scenario> + '_ {
        CartesianProduct::new(self.radices.clone()).map(move |index| self.scenario_at(&index))
    }

    /// Every run of the sweep: each combination repeated `niter` times.
    pub fn scenarios(&self) -> impl Iterator<Item = Scenario> + '_ {
        let niter = self.niter as usize;
        self.combinations_iter()
            .flat_map(move |scenario| std::iter::repeat(scenario).take(niter))
    }
}

fn side_at(ranges: &SideRanges, index: &[u64]) -> SideParams {
    SideParams {
        size: ranges.size.value_at(index[0]),
        health: ranges.health.value_at(index[1]),
        shot_prob: ranges.shot_prob.value_at(index[2]),
        max_shots: ranges.max_shots.value_at(index[3]),
        retreat_threshold: ranges.retreat_threshold.value_at(index[4]),
    }
}
