//! Error taxonomy for configuration, exploration and persistence.

use lanchester_env::EnvError;
use thiserror::Error;

/// Result alias used throughout the simulator.
pub type Result<T> = std::result::Result<T, LanchesterError>;

/// Everything that can stop an exploration session.
///
/// Combat itself never fails once a scenario has been accepted; every
/// variant here is raised either before the first run or at the sink.
#[derive(Debug, Error)]
pub enum LanchesterError {
    /// Scenario template file could not be read
    #[error("Cannot read scenario template {path}: {source}")]
    ConfigUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Scenario template is not valid JSON or has the wrong shape
    #[error("Malformed scenario template: {0}")]
    ConfigMalformed(#[from] serde_json::Error),

    /// Scenario template parsed but holds impossible values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Concrete scenario rejected before reaching the engine
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Batch mode exists in the format but has no implementation
    #[error("Batch mode '{0}' is not implemented")]
    UnimplementedMode(String),

    /// Sweep run count does not fit in 64 bits
    #[error("Parameter sweep is too large to enumerate")]
    SweepTooLarge,

    /// Engine ran past the configured turn limit
    #[error("Combat did not resolve within {0} turns")]
    TurnLimitExceeded(u64),

    /// Result sink failed to commit a record
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Random source rejected a sampling request
    #[error("Sampling error: {0}")]
    Sampling(#[from] EnvError),
}

impl LanchesterError {
    /// Creates an invalid-configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates an invalid-scenario error.
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::InvalidScenario(msg.into())
    }

    /// Creates a persistence error from any displayable cause.
    pub fn persistence(cause: impl std::fmt::Display) -> Self {
        Self::Persistence(cause.to_string())
    }

    /// Process exit status used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigUnreadable { .. } => 2,
            Self::ConfigMalformed(_)
            | Self::InvalidConfig(_)
            | Self::InvalidScenario(_)
            | Self::SweepTooLarge
            | Self::Sampling(_) => 3,
            Self::UnimplementedMode(_) => 4,
            Self::Persistence(_) => 5,
            Self::TurnLimitExceeded(_) => 6,
        }
    }
}
