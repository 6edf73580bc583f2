//! Exploration sessions: single runs, sweeps and Monte Carlo batches.

use crate::exporter::{ResultSink, RunRecord};
use crate::runner::ScenarioRunner;
use lanchester_core::{
    BatchMode, LanchesterError, MonteCarloSampler, Outcome, Result, ScenarioTemplate, SweepPlan,
    sweep::DIMENSIONS,
};
use lanchester_env::{RandomSource, SeededSource};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Tally of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Batch mode that ran
    pub mode: String,

    /// Seed of the session's random stream
    pub seed: u64,

    /// Runs completed
    pub runs: u64,

    pub red_victories: u64,
    pub blue_victories: u64,
    pub ties: u64,

    /// True if the operator declined the sweep
    pub cancelled: bool,
}

impl SessionSummary {
    fn tally(&mut self, record: &RunRecord) {
        self.runs += 1;
        match record.victor {
            Outcome::RedVictory => self.red_victories += 1,
            Outcome::BlueVictory => self.blue_victories += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Incomplete => {}
        }
    }
}

/// One exploration session.
///
/// Owns the only state shared between runs: the random stream and the run
/// counter. Scenarios and forces stay local to each run.
pub struct Session<S: ResultSink> {
    template: ScenarioTemplate,
    runner: ScenarioRunner,
    rng: SeededSource,
    sink: S,
}

impl<S: ResultSink> Session<S> {
    /// Creates a session. The stream is seeded from the template, or from the
    /// OS when the template has no seed.
    pub fn new(template: ScenarioTemplate, sink: S) -> Self {
        let rng = match template.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };
        let runner = ScenarioRunner::new().with_dynamics(template.write_dynamics);
        Self {
            template,
            runner,
            rng,
            sink,
        }
    }

    /// Reseeds the stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SeededSource::new(seed);
        self
    }

    /// Caps turns per run.
    pub fn with_turn_limit(mut self, limit: Option<u64>) -> Self {
        self.runner = self.runner.with_turn_limit(limit);
        self
    }

    /// Seed of the session stream.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the template's batch mode.
    ///
    /// `confirm` is asked once, with the total run count, before a sweep
    /// starts; returning `false` cancels with zero runs.
    pub fn execute(&mut self, confirm: impl FnOnce(u64) -> bool) -> Result<SessionSummary> {
        self.template.validate()?;

        let mut summary = SessionSummary {
            mode: self.template.batch_mode.name().to_string(),
            seed: self.rng.seed(),
            ..Default::default()
        };

        info!(
            "Starting {} session (seed={}, sink={})",
            self.template.batch_mode,
            summary.seed,
            self.sink.name()
        );

        match self.template.batch_mode {
            BatchMode::Single => {
                let scenario = self.template.base_scenario();
                let record = self.runner.run(&scenario, &mut self.rng, &mut self.sink)?;
                summary.tally(&record);
            }
            BatchMode::Sweep => {
                let plan = SweepPlan::new(&self.template)?;
                for (name, count) in DIMENSIONS.iter().zip(plan.dimension_counts()) {
                    debug!("  {}: {} value(s)", name, count);
                }
                info!(
                    "Sweep: {} combinations x {} iterations = {} runs",
                    plan.combinations(),
                    self.template.niter,
                    plan.total_runs()
                );

                if !confirm(plan.total_runs()) {
                    warn!("Cancelling parameter sweep");
                    summary.cancelled = true;
                    return Ok(summary);
                }

                for scenario in plan.scenarios() {
                    let record = self.runner.run(&scenario, &mut self.rng, &mut self.sink)?;
                    summary.tally(&record);
                }
            }
            BatchMode::MonteCarlo => {
                let sampler = MonteCarloSampler::new(&self.template)?;
                info!("Monte Carlo: {} trials", sampler.trials());

                for _ in 0..sampler.trials() {
                    let scenario = sampler.sample(&mut self.rng)?;
                    let record = self.runner.run(&scenario, &mut self.rng, &mut self.sink)?;
                    summary.tally(&record);
                }
            }
            BatchMode::LatinHypercube => {
                return Err(LanchesterError::UnimplementedMode(
                    BatchMode::LatinHypercube.name().to_string(),
                ));
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::MemorySink;
    use lanchester_core::ActivationOrder;
    use std::collections::HashSet;

    const TEMPLATE: &str = r#"{
        "batchMode": "sweep",
        "niter": 2,
        "seed": 42,
        "activationOrder": ["random-synchronous", "uniform-synchronous"],
        "redSize": [4, 8, 2],
        "redHealth": [1, 1, 0],
        "redShotProb": [0.3, 0.3, 0],
        "redMaxShots": [2, 2, 0],
        "redRetreatThreshold": [0.25, 0.25, 0],
        "blueSize": [6, 6, 0],
        "blueHealth": [1, 1, 0],
        "blueShotProb": [0.3, 0.5, 0.2],
        "blueMaxShots": [2, 2, 0],
        "blueRetreatThreshold": [0.25, 0.25, 0]
    }"#;

    fn template(mode: BatchMode) -> ScenarioTemplate {
        let mut template = ScenarioTemplate::from_json_str(TEMPLATE).unwrap();
        template.batch_mode = mode;
        template
    }

    #[test]
    fn test_sweep_runs_every_combination() {
        let mut session = Session::new(template(BatchMode::Sweep), MemorySink::default());
        let mut asked = None;

        let summary = session
            .execute(|total| {
                asked = Some(total);
                true
            })
            .unwrap();

        // 2 orders x 3 red sizes x 2 blue shot probs x 2 iterations
        assert_eq!(asked, Some(24));
        assert_eq!(summary.runs, 24);
        assert_eq!(summary.red_victories + summary.blue_victories + summary.ties, 24);

        let records = &session.sink().records;
        let runs: Vec<u64> = records.iter().map(|r| r.run).collect();
        assert_eq!(runs, (1..=24).collect::<Vec<_>>());
        assert_eq!(records[0].red_size, 4);
        assert_eq!(records[23].activation_order, ActivationOrder::UniformSynchronous);
        assert!(records.iter().all(|r| r.victor != Outcome::Incomplete));
    }

    #[test]
    fn test_declined_sweep_runs_nothing() {
        let mut session = Session::new(template(BatchMode::Sweep), MemorySink::default());

        let summary = session.execute(|_| false).unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.runs, 0);
        assert!(session.sink().records.is_empty());
    }

    #[test]
    fn test_single_run_uses_base_scenario() {
        let mut session = Session::new(template(BatchMode::Single), MemorySink::default());
        let summary = session.execute(|_| panic!("single runs need no confirmation")).unwrap();

        assert_eq!(summary.runs, 1);
        let record = &session.sink().records[0];
        assert_eq!(record.red_size, 4);
        assert_eq!(record.blue_shot_prob, 0.3);
        assert_eq!(record.activation_order, ActivationOrder::RandomSynchronous);
    }

    #[test]
    fn test_monte_carlo_samples_within_ranges() {
        let mut t = template(BatchMode::MonteCarlo);
        t.niter = 40;
        let mut session = Session::new(t, MemorySink::default());

        let summary = session.execute(|_| true).unwrap();

        assert_eq!(summary.runs, 40);
        let records = &session.sink().records;
        assert!(records.iter().all(|r| (4..=8).contains(&r.red_size)));
        assert!(records
            .iter()
            .all(|r| r.blue_shot_prob >= 0.3 && r.blue_shot_prob < 0.5));
        let sizes: HashSet<u32> = records.iter().map(|r| r.red_size).collect();
        assert!(sizes.len() > 1);
    }

    #[test]
    fn test_latin_hypercube_is_rejected_without_runs() {
        let mut session = Session::new(template(BatchMode::LatinHypercube), MemorySink::default());

        let err = session.execute(|_| true).unwrap_err();

        assert!(matches!(err, LanchesterError::UnimplementedMode(_)));
        assert!(session.sink().records.is_empty());
    }

    #[test]
    fn test_session_replays_from_seed() {
        let run = |seed| {
            let mut session =
                Session::new(template(BatchMode::MonteCarlo), MemorySink::default()).with_seed(seed);
            session.execute(|_| true).unwrap();
            session.into_sink().records
        };
        assert_eq!(run(9), run(9));
        assert_eq!(
            Session::new(template(BatchMode::Single), MemorySink::default()).seed(),
            42
        );
    }
}
