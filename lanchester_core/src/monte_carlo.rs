//! Monte Carlo scenario sampling.

use crate::config::{ScenarioTemplate, SideRanges};
use crate::error::Result;
use crate::scenario::{Scenario, SideParams};
use lanchester_env::RandomSource;

/// Draws independent scenarios uniformly from a template's ranges.
///
/// Integer dimensions are inclusive of both ends, real dimensions are
/// half-open `[low, high)`, and steps are ignored. Draw order per trial is
/// activation order, then red, then blue (size, health, shot probability,
/// max shots, retreat threshold).
#[derive(Debug, Clone)]
pub struct MonteCarloSampler<'t> {
    template: &'t ScenarioTemplate,
}

impl<'t> MonteCarloSampler<'t> {
    pub fn new(template: &'t ScenarioTemplate) -> Result<Self> {
        template.validate()?;
        Ok(Self { template })
    }

    /// Number of trials the session should run.
    pub fn trials(&self) -> u32 {
        self.template.niter
    }

    /// Draws one scenario.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Scenario> {
        let orders = &self.template.activation_orders;
        let activation_order = orders[rng.index(orders.len())];
        let red = sample_side(&self.template.red, rng)?;
        let blue = sample_side(&self.template.blue, rng)?;
        Ok(Scenario {
            activation_order,
            red,
            blue,
        })
    }
}

fn sample_side<R: RandomSource + ?Sized>(ranges: &SideRanges, rng: &mut R) -> Result<SideParams> {
    Ok(SideParams {
        size: ranges.size.sample(rng)?,
        health: ranges.health.sample(rng)?,
        shot_prob: ranges.shot_prob.sample(rng)?,
        max_shots: ranges.max_shots.sample(rng)?,
        retreat_threshold: ranges.retreat_threshold.sample(rng)?,
    })
}
