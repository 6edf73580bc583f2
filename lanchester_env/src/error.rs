//! Error types for the randomness abstraction.

use thiserror::Error;

/// Errors raised when a random draw is requested with impossible bounds.
#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    /// Integer draw over an empty range
    #[error("Empty integer range: [{low}, {high}]")]
    EmptyRange { low: u64, high: u64 },

    /// Real draw over a reversed or non-finite interval
    #[error("Invalid real interval: [{low}, {high})")]
    InvalidInterval { low: f64, high: f64 },
}
