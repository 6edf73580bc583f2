//! Per-run state.

use crate::exporter::RunRecord;
use lanchester_core::{CasualtyEvent, Force, Outcome, Result, Scenario};

/// Everything one run owns: its scenario, both forces and its turn counter.
///
/// Created fresh for every run and dropped once the record is emitted; no
/// state leaks between runs.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Session-wide run number (1-based)
    pub run_index: u64,

    /// Parameters for this run
    pub scenario: Scenario,

    pub red: Force,
    pub blue: Force,

    /// Turns elapsed so far
    pub turns: u64,
}

impl RunContext {
    /// Validates the scenario and builds both forces.
    pub fn new(run_index: u64, scenario: Scenario) -> Result<Self> {
        scenario.validate()?;
        Ok(Self {
            run_index,
            red: Force::from_params(&scenario.red),
            blue: Force::from_params(&scenario.blue),
            scenario,
            turns: 0,
        })
    }

    /// Final record for this run.
    pub fn record(&self, outcome: Outcome) -> RunRecord {
        self.snapshot(self.turns, self.red.len(), self.blue.len(), outcome)
    }

    /// One `incomplete` record per turn before the last, carrying the
    /// survivor counts at the end of that turn.
    pub fn dynamics(&self, trace: &[CasualtyEvent]) -> Vec<RunRecord> {
        let mut red_left = self.red.force_size();
        let mut blue_left = self.blue.force_size();
        let mut events = trace.iter().peekable();

        (1..self.turns)
            .map(|turn| {
                while let Some(event) = events.next_if(|e| e.turn <= turn) {
                    red_left = event.red_remaining;
                    blue_left = event.blue_remaining;
                }
                self.snapshot(turn, red_left, blue_left, Outcome::Incomplete)
            })
            .collect()
    }

    fn snapshot(&self, turns: u64, red_left: usize, blue_left: usize, victor: Outcome) -> RunRecord {
        let red = &self.scenario.red;
        let blue = &self.scenario.blue;
        RunRecord {
            run: self.run_index,
            activation_order: self.scenario.activation_order,
            red_size: red.size,
            red_health: red.health,
            red_shot_prob: red.shot_prob,
            red_max_shots: red.max_shots,
            red_retreat_threshold: red.retreat_threshold,
            red_forces: red_left,
            blue_size: blue.size,
            blue_health: blue.health,
            blue_shot_prob: blue.shot_prob,
            blue_max_shots: blue.max_shots,
            blue_retreat_threshold: blue.retreat_threshold,
            blue_forces: blue_left,
            victor,
            turns,
        }
    }
}
