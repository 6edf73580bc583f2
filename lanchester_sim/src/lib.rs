//! Lanchester Simulation Harness
//!
//! Drives the combat engine from `lanchester_core` over whole exploration
//! sessions and persists one record per run.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Session                           │
//! │   ScenarioTemplate ──► {single | SweepPlan | MonteCarlo} │
//! │                              │ Scenario                  │
//! │                              ▼                           │
//! │  SeededSource ◄────── ScenarioRunner (run counter)       │
//! │  (one stream)                │ RunContext per run        │
//! │                              ▼                           │
//! │                        CombatEngine                      │
//! │                              │ RunRecord                 │
//! │                              ▼                           │
//! │                 ResultSink (csv | jsonl | log)           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lanchester_core::ScenarioTemplate;
//! use lanchester_sim::{MemorySink, Session};
//!
//! let template = ScenarioTemplate::load("parameters.json")?;
//! let mut session = Session::new(template, MemorySink::default()).with_seed(42);
//! let summary = session.execute(|_total_runs| true)?;
//! ```

mod context;
pub mod exporter;
mod runner;
mod session;

pub use context::RunContext;
pub use exporter::{open_sink, CsvSink, JsonLinesSink, MemorySink, ResultSink, RunRecord, TracingSink};
pub use runner::ScenarioRunner;
pub use session::{Session, SessionSummary};
