//! Progress reporting for a run.
//!
//! [`NoProgress`] is the default. [`LogProgress`] emits one info event per
//! model; [`JsonProgress`] writes JSON lines to stderr for wrapping tools
//! (the CLI's `--progress` flag).

use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::ProgressReporter;

/// Reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _model: &str, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// Progress of the model currently loading.
#[derive(Debug, Clone)]
struct ModelProgress {
    model: String,
    total: usize,
    processed: usize,
    started: Instant,
}

impl ModelProgress {
    fn new(model: &str, total: usize) -> Self {
        Self {
            model: model.to_string(),
            total,
            processed: 0,
            started: Instant::now(),
        }
    }

    fn records_per_second(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.processed as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Logs one info event per model when it finishes.
#[derive(Debug, Default)]
pub struct LogProgress {
    current: Option<ModelProgress>,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for LogProgress {
    fn start(&mut self, model: &str, total: usize) {
        self.current = Some(ModelProgress::new(model, total));
    }

    fn advance(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.processed += 1;
        }
    }

    fn finish(&mut self) {
        if let Some(current) = self.current.take() {
            info!(
                model = %current.model,
                processed = current.processed,
                total = current.total,
                "Loaded {:<25} {} records ({:.0} records/sec)",
                current.model,
                current.processed,
                current.records_per_second()
            );
        }
    }
}

/// One line of JSON progress output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// When the update was produced.
    pub timestamp: DateTime<Utc>,

    /// `started`, `loading` or `finished`.
    pub phase: String,

    /// Registry name of the model.
    pub model: String,

    /// Records processed so far.
    pub processed: usize,

    /// Source records of this model.
    pub total: usize,
}

/// Writes [`ProgressUpdate`] JSON lines, every `every` records and at each
/// model boundary.
pub struct JsonProgress<W: Write = std::io::Stderr> {
    writer: W,
    every: usize,
    current: Option<ModelProgress>,
}

impl JsonProgress<std::io::Stderr> {
    /// Report to stderr.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> JsonProgress<W> {
    /// Report to `writer`, an update every 1000 records.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            every: 1000,
            current: None,
        }
    }

    /// Emit a loading update every `every` records.
    pub fn every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, phase: &str) {
        let Some(current) = self.current.as_ref() else {
            return;
        };
        let update = ProgressUpdate {
            timestamp: Utc::now(),
            phase: phase.to_string(),
            model: current.model.clone(),
            processed: current.processed,
            total: current.total,
        };
        // Progress output is best effort.
        if let Ok(line) = serde_json::to_string(&update) {
            let _ = writeln!(self.writer, "{}", line);
        }
    }
}

impl<W: Write> ProgressReporter for JsonProgress<W> {
    fn start(&mut self, model: &str, total: usize) {
        self.current = Some(ModelProgress::new(model, total));
        self.emit("started");
    }

    fn advance(&mut self) {
        let due = match self.current.as_mut() {
            Some(current) => {
                current.processed += 1;
                current.processed % self.every == 0
            }
            None => false,
        };
        if due {
            self.emit("loading");
        }
    }

    fn finish(&mut self) {
        self.emit("finished");
        let _ = self.writer.flush();
        self.current = None;
    }
}
