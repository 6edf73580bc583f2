//! Result sinks.
//!
//! Every finished run produces one [`RunRecord`]. Sinks are append-only and
//! flush after each record, so a failure mid-session loses at most the
//! record being written.

use lanchester_core::{ActivationOrder, LanchesterError, Outcome, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One row of output: a finished run, or an intermediate turn when
/// dynamics are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunRecord {
    pub run: u64,
    pub activation_order: ActivationOrder,
    pub red_size: u32,
    pub red_health: u32,
    pub red_shot_prob: f64,
    pub red_max_shots: u32,
    pub red_retreat_threshold: f64,
    /// Red survivors
    pub red_forces: usize,
    pub blue_size: u32,
    pub blue_health: u32,
    pub blue_shot_prob: f64,
    pub blue_max_shots: u32,
    pub blue_retreat_threshold: f64,
    /// Blue survivors
    pub blue_forces: usize,
    pub victor: Outcome,
    pub turns: u64,
}

impl RunRecord {
    /// Column names, in field order.
    pub const HEADERS: [&'static str; 16] = [
        "run",
        "activation-order",
        "red-size",
        "red-health",
        "red-shot-prob",
        "red-max-shots",
        "red-retreat-threshold",
        "red-forces",
        "blue-size",
        "blue-health",
        "blue-shot-prob",
        "blue-max-shots",
        "blue-retreat-threshold",
        "blue-forces",
        "victor",
        "turns",
    ];
}

/// Destination for run records.
pub trait ResultSink {
    /// Commits one record. Errors are fatal to the session.
    fn record(&mut self, record: &RunRecord) -> Result<()>;

    /// Returns the name of this sink (for logging).
    fn name(&self) -> &str;
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn record(&mut self, record: &RunRecord) -> Result<()> {
        (**self).record(record)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// CSV output with a header row written up front.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer and emits the header.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer
            .write_record(RunRecord::HEADERS)
            .map_err(LanchesterError::persistence)?;
        writer.flush().map_err(LanchesterError::persistence)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| LanchesterError::persistence(e.error()))
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn record(&mut self, record: &RunRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .map_err(LanchesterError::persistence)?;
        self.writer.flush().map_err(LanchesterError::persistence)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn record(&mut self, record: &RunRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(LanchesterError::persistence)?;
        writeln!(self.writer).map_err(LanchesterError::persistence)?;
        self.writer.flush().map_err(LanchesterError::persistence)
    }

    fn name(&self) -> &str {
        "json-lines"
    }
}

/// Logs each record at `info` level. Used when no output file is configured.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ResultSink for TracingSink {
    fn record(&mut self, r: &RunRecord) -> Result<()> {
        info!(
            "run {} [{}] {} after {} turns (red {}/{}, blue {}/{})",
            r.run, r.activation_order, r.victor, r.turns, r.red_forces, r.red_size, r.blue_forces, r.blue_size
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<RunRecord>,
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: &RunRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Opens the sink for an output path, truncating any existing file.
///
/// `.json` and `.jsonl` select JSON lines; anything else is CSV. `None`
/// logs records instead.
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn ResultSink>> {
    let Some(path) = path else {
        return Ok(Box::new(TracingSink));
    };

    let file = File::create(path).map_err(|e| {
        LanchesterError::persistence(format!("cannot create {}: {}", path.display(), e))
    })?;
    let writer = BufWriter::new(file);

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") | Some("jsonl") => Ok(Box::new(JsonLinesSink::new(writer))),
        _ => Ok(Box::new(CsvSink::new(writer)?)),
    }
}
