//! Scenario templates: the JSON configuration that drives a session.
//!
//! ```json
//! {
//!   "filename": "results.csv",
//!   "batchMode": "sweep",
//!   "niter": 10,
//!   "activationOrder": ["random-synchronous", "uniform-asynchronous"],
//!   "redSize": [10, 50, 10],      "blueSize": [30, 30, 0],
//!   "redHealth": [1, 1, 0],       "blueHealth": [1, 1, 0],
//!   "redShotProb": [0.1, 0.3, 0.1], "blueShotProb": [0.2, 0.2, 0],
//!   "redMaxShots": [1, 1, 0],     "blueMaxShots": [1, 1, 0],
//!   "redRetreatThreshold": [0.3, 0.3, 0], "blueRetreatThreshold": [0.3, 0.3, 0]
//! }
//! ```

use crate::error::{LanchesterError, Result};
use crate::range::DimensionRange;
use crate::scenario::{Scenario, SideParams};
use crate::types::{ActivationOrder, BatchMode, Side};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Ranges for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideRanges {
    pub size: DimensionRange<u32>,
    pub health: DimensionRange<u32>,
    pub shot_prob: DimensionRange<f64>,
    pub max_shots: DimensionRange<u32>,
    pub retreat_threshold: DimensionRange<f64>,
}

impl SideRanges {
    /// Every range pinned at the given values.
    pub fn fixed(params: SideParams) -> Self {
        Self {
            size: DimensionRange::new(params.size, params.size, 0),
            health: DimensionRange::new(params.health, params.health, 0),
            shot_prob: DimensionRange::new(params.shot_prob, params.shot_prob, 0.0),
            max_shots: DimensionRange::new(params.max_shots, params.max_shots, 0),
            retreat_threshold: DimensionRange::new(
                params.retreat_threshold,
                params.retreat_threshold,
                0.0,
            ),
        }
    }

    /// The low end of every range.
    pub fn lows(&self) -> SideParams {
        SideParams {
            size: self.size.low,
            health: self.health.low,
            shot_prob: self.shot_prob.low,
            max_shots: self.max_shots.low,
            retreat_threshold: self.retreat_threshold.low,
        }
    }

    fn validate(&self, side: Side) -> Result<()> {
        self.size.validate(&format!("{} size", side))?;
        self.health.validate(&format!("{} health", side))?;
        self.shot_prob.validate(&format!("{} shot probability", side))?;
        self.max_shots.validate(&format!("{} max shots", side))?;
        self.retreat_threshold
            .validate(&format!("{} retreat threshold", side))?;

        if self.size.low == 0 {
            return Err(LanchesterError::config(format!("{} size must start at 1 or more", side)));
        }
        if self.health.low == 0 {
            return Err(LanchesterError::config(format!(
                "{} health must start at 1 or more",
                side
            )));
        }
        for (name, range) in [
            ("shot probability", &self.shot_prob),
            ("retreat threshold", &self.retreat_threshold),
        ] {
            if range.low < 0.0 || range.low.max(range.high) > 1.0 {
                return Err(LanchesterError::config(format!(
                    "{} {} must lie within [0, 1]",
                    side, name
                )));
            }
        }
        Ok(())
    }
}

/// A validated scenario template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTemplate")]
pub struct ScenarioTemplate {
    /// Output path; `None` logs records instead of persisting them
    pub output: Option<PathBuf>,

    /// Emit one record per intermediate turn as well as the final one
    pub write_dynamics: bool,

    pub batch_mode: BatchMode,

    /// Repetitions per sweep combination, or Monte Carlo trials
    pub niter: u32,

    /// Debug-level narration
    pub verbose: bool,

    /// Session seed; `None` draws one from the OS
    pub seed: Option<u64>,

    /// Candidate activation orders, never empty
    pub activation_orders: Vec<ActivationOrder>,

    pub red: SideRanges,
    pub blue: SideRanges,
}

impl ScenarioTemplate {
    /// Template for a single fixed scenario.
    pub fn single(scenario: Scenario) -> Self {
        Self {
            output: None,
            write_dynamics: false,
            batch_mode: BatchMode::Single,
            niter: 1,
            verbose: false,
            seed: None,
            activation_orders: vec![scenario.activation_order],
            red: SideRanges::fixed(scenario.red),
            blue: SideRanges::fixed(scenario.blue),
        }
    }

    /// Parses and validates a template from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and validates a template file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| {
            LanchesterError::ConfigUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Single-run scenario: every range's low value and the first listed
    /// activation order.
    pub fn base_scenario(&self) -> Scenario {
        Scenario {
            activation_order: self.activation_orders[0],
            red: self.red.lows(),
            blue: self.blue.lows(),
        }
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        if self.activation_orders.is_empty() {
            return Err(LanchesterError::config("activationOrder must list at least one order"));
        }
        if self.niter == 0 {
            return Err(LanchesterError::config("niter must be at least 1"));
        }
        self.red.validate(Side::Red)?;
        self.blue.validate(Side::Blue)
    }
}

/// Wire shape of the template. Accepts camelCase keys and the capitalised
/// legacy spelling (`RedSize`, ...).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    write_dynamics: bool,
    #[serde(default)]
    batch_mode: BatchMode,
    #[serde(default = "default_niter")]
    niter: u32,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    seed: Option<u64>,
    activation_order: Vec<ActivationOrder>,

    #[serde(alias = "RedSize")]
    red_size: DimensionRange<u32>,
    #[serde(alias = "RedHealth")]
    red_health: DimensionRange<u32>,
    #[serde(alias = "RedShotProb")]
    red_shot_prob: DimensionRange<f64>,
    #[serde(alias = "RedMaxShots")]
    red_max_shots: DimensionRange<u32>,
    #[serde(alias = "RedRetreatThreshold")]
    red_retreat_threshold: DimensionRange<f64>,

    #[serde(alias = "BlueSize")]
    blue_size: DimensionRange<u32>,
    #[serde(alias = "BlueHealth")]
    blue_health: DimensionRange<u32>,
    #[serde(alias = "BlueShotProb")]
    blue_shot_prob: DimensionRange<f64>,
    #[serde(alias = "BlueMaxShots")]
    blue_max_shots: DimensionRange<u32>,
    #[serde(alias = "BlueRetreatThreshold")]
    blue_retreat_threshold: DimensionRange<f64>,
}

fn default_niter() -> u32 {
    1
}

impl TryFrom<RawTemplate> for ScenarioTemplate {
    type Error = LanchesterError;

    fn try_from(raw: RawTemplate) -> Result<Self> {
        let template = Self {
            output: raw.filename.filter(|f| !f.is_empty()).map(PathBuf::from),
            write_dynamics: raw.write_dynamics,
            batch_mode: raw.batch_mode,
            niter: raw.niter,
            verbose: raw.verbose,
            seed: raw.seed,
            activation_orders: raw.activation_order,
            red: SideRanges {
                size: raw.red_size,
                health: raw.red_health,
                shot_prob: raw.red_shot_prob,
                max_shots: raw.red_max_shots,
                retreat_threshold: raw.red_retreat_threshold,
            },
            blue: SideRanges {
                size: raw.blue_size,
                health: raw.blue_health,
                shot_prob: raw.blue_shot_prob,
                max_shots: raw.blue_max_shots,
                retreat_threshold: raw.blue_retreat_threshold,
            },
        };
        template.validate()?;
        Ok(template)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SWEEP_JSON: &str = r#"{
        "batchMode": "sweep",
        "niter": 3,
        "activationOrder": ["random-synchronous", "uniform-asynchronous"],
        "redSize": [2, 10, 2],
        "redHealth": [1, 1, 0],
        "redShotProb": [0.1, 0.3, 0.1],
        "redMaxShots": [1, 2, 1],
        "redRetreatThreshold": [0.5, 0.5, 0],
        "blueSize": [10, 10, 0],
        "blueHealth": [1, 2, 1],
        "blueShotProb": [0.2, 0.2, 0],
        "blueMaxShots": [1, 1, 0],
        "blueRetreatThreshold": [0.5, 0.5, 0]
    }"#;

    #[test]
    fn test_parses_sweep_template() {
        let template = ScenarioTemplate::from_json_str(SWEEP_JSON).unwrap();
        assert_eq!(template.batch_mode, BatchMode::Sweep);
        assert_eq!(template.niter, 3);
        assert_eq!(template.activation_orders.len(), 2);
        assert_eq!(template.red.size, DimensionRange::new(2, 10, 2));
        assert_eq!(template.output, None);
        assert!(!template.write_dynamics);
    }

    #[test]
    fn test_accepts_legacy_keys() {
        let legacy = SWEEP_JSON
            .replace("\"redSize\"", "\"RedSize\"")
            .replace("\"blueRetreatThreshold\"", "\"BlueRetreatThreshold\"");
        let template = ScenarioTemplate::from_json_str(&legacy).unwrap();
        assert_eq!(template.red.size.high, 10);
    }

    #[test]
    fn test_base_scenario_uses_lows_and_first_order() {
        let template = ScenarioTemplate::from_json_str(SWEEP_JSON).unwrap();
        let scenario = template.base_scenario();
        assert_eq!(scenario.activation_order, ActivationOrder::RandomSynchronous);
        assert_eq!(scenario.red.size, 2);
        assert_eq!(scenario.red.max_shots, 1);
        assert_eq!(scenario.blue.health, 1);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = ScenarioTemplate::from_json_str(r#"{"activationOrder": []}"#).unwrap_err();
        assert!(matches!(err, LanchesterError::ConfigMalformed(_)));
    }

    #[test]
    fn test_empty_activation_list_rejected() {
        let json = SWEEP_JSON.replace(
            r#"["random-synchronous", "uniform-asynchronous"]"#,
            "[]",
        );
        assert!(ScenarioTemplate::from_json_str(&json).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let json = SWEEP_JSON.replace("[2, 10, 2]", "[0, 10, 2]");
        let err = ScenarioTemplate::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("red size"));
    }

    #[test]
    fn test_probability_above_one_rejected() {
        let json = SWEEP_JSON.replace("[0.1, 0.3, 0.1]", "[0.1, 1.3, 0.1]");
        assert!(ScenarioTemplate::from_json_str(&json).is_err());
    }

    #[test]
    fn test_unreadable_file() {
        let err = ScenarioTemplate::load("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_single_template_round_trips_scenario() {
        let template = ScenarioTemplate::from_json_str(SWEEP_JSON).unwrap();
        let scenario = template.base_scenario();
        assert_eq!(ScenarioTemplate::single(scenario).base_scenario(), scenario);
    }
}
