//! Record sinks: where resolved records go.
//!
//! The core never persists anything itself. A [`RecordSink`] receives each
//! record once it is indexed; the CLI writes them as JSON lines, tests
//! collect them in memory, and a dry run discards them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{ModelSchema, RecordSink, ResolvedRecord};
use crate::error::{ImportError, Result};

/// Collects records in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<ResolvedRecord>,
    finished: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in the order they were accepted.
    pub fn records(&self) -> &[ResolvedRecord] {
        &self.records
    }

    /// Records of one model, by registry name.
    pub fn of_model<'s>(&'s self, model: &'s str) -> impl Iterator<Item = &'s ResolvedRecord> + 's {
        self.records.iter().filter(move |r| r.model == model)
    }

    /// Position of the first record of `model`, if any.
    pub fn position(&self, model: &str) -> Option<usize> {
        self.records.iter().position(|r| r.model == model)
    }

    /// Whether [`RecordSink::finish`] was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the sink, returning the records.
    pub fn into_records(self) -> Vec<ResolvedRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, _schema: &ModelSchema, record: &ResolvedRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes one JSON object per record, one record per line.
///
/// Each line carries the model name and Nautobot label, the derived `id`
/// for owned models, and the constructed `fields`.
pub struct JsonLinesSink<W: Write = BufWriter<File>> {
    writer: W,
    path: Option<PathBuf>,
    written: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create (or truncate) the output file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "Writing resolved records");
        Ok(Self {
            writer: BufWriter::new(file),
            path: Some(path.to_path_buf()),
            written: 0,
        })
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap an arbitrary writer.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            path: None,
            written: 0,
        }
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Output path, when writing to a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Consume the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, schema: &ModelSchema, record: &ResolvedRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| ImportError::sink(schema.name, e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| ImportError::sink(schema.name, e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        debug!(records = self.written, "Flushed resolved records");
        Ok(())
    }
}

/// Discards every record (dry run).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    accepted: usize,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records accepted and discarded.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl RecordSink for NullSink {
    fn accept(&mut self, _schema: &ModelSchema, _record: &ResolvedRecord) -> Result<()> {
        self.accepted += 1;
        Ok(())
    }
}
