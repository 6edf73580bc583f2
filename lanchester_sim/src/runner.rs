//! Run orchestrator - executes one scenario end to end.

use crate::context::RunContext;
use crate::exporter::{ResultSink, RunRecord};
use lanchester_core::{CombatEngine, Result, Scenario};
use lanchester_env::RandomSource;
use tracing::{debug, warn};

/// Runs scenarios one at a time and numbers them.
///
/// The run counter is shared across a whole session: sweep and Monte Carlo
/// runs get consecutive indices starting at 1.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Index given to the next run
    next_run: u64,

    /// Optional cap on turns per run
    turn_limit: Option<u64>,

    /// Emit per-turn records before the final one
    write_dynamics: bool,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Creates a runner whose first run is numbered 1.
    pub fn new() -> Self {
        Self {
            next_run: 1,
            turn_limit: None,
            write_dynamics: false,
        }
    }

    /// Sets the turn limit.
    pub fn with_turn_limit(mut self, limit: Option<u64>) -> Self {
        self.turn_limit = limit;
        self
    }

    /// Enables per-turn records.
    pub fn with_dynamics(mut self, enabled: bool) -> Self {
        self.write_dynamics = enabled;
        self
    }

    /// Runs completed so far.
    pub fn runs_completed(&self) -> u64 {
        self.next_run - 1
    }

    /// Runs one scenario and commits its record to `sink`.
    ///
    /// The scenario is validated before the engine sees it. The run counter
    /// only advances once the final record is committed.
    pub fn run<R, S>(&mut self, scenario: &Scenario, rng: &mut R, sink: &mut S) -> Result<RunRecord>
    where
        R: RandomSource + ?Sized,
        S: ResultSink + ?Sized,
    {
        let mut ctx = RunContext::new(self.next_run, *scenario)?;

        debug!("Starting run number {}", ctx.run_index);
        debug!("  The red force has {}.", ctx.red);
        debug!("  The blue force has {}.", ctx.blue);
        debug!("  Running model with {} activation", scenario.activation_order);

        if self.turn_limit.is_none()
            && !scenario.red.can_inflict_damage()
            && !scenario.blue.can_inflict_damage()
        {
            warn!(
                "Run {}: neither side can inflict damage; it only ends on a retreat",
                ctx.run_index
            );
        }

        let resolution = CombatEngine::new(rng)
            .with_turn_limit(self.turn_limit)
            .resolve(&mut ctx.red, &mut ctx.blue, scenario.activation_order)?;
        ctx.turns = resolution.turns;

        for event in &resolution.trace {
            if !event.red_removed.is_empty() {
                debug!("  turn {}: red forces {:?} killed", event.turn, event.red_removed);
            }
            if !event.blue_removed.is_empty() {
                debug!("  turn {}: blue forces {:?} killed", event.turn, event.blue_removed);
            }
        }

        if self.write_dynamics {
            for row in ctx.dynamics(&resolution.trace) {
                sink.record(&row)?;
            }
        }

        let record = ctx.record(resolution.outcome);
        sink.record(&record)?;

        debug!(
            "Run {} finished after {} turns: {} (red {} left, blue {} left)",
            ctx.run_index,
            ctx.turns,
            resolution.outcome,
            ctx.red.len(),
            ctx.blue.len()
        );

        self.next_run += 1;
        Ok(record)
    }
}
