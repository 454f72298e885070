//! Seams between the import core and its collaborators.
//!
//! - [`RecordSink`]: receives every record the loader constructs
//! - [`ProgressReporter`]: per-model progress of a run
//!
//! Both are driven synchronously from the orchestrator's single thread.

use crate::error::Result;

use super::record::ResolvedRecord;
use super::schema::ModelSchema;

/// Destination of resolved records.
///
/// Called once per constructed record, synthesized records included, in
/// load order. Records whose model ignore rule matched are never passed in.
pub trait RecordSink {
    /// Accept one record.
    fn accept(&mut self, schema: &ModelSchema, record: &ResolvedRecord) -> Result<()>;

    /// Flush buffered output at the end of a run.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn accept(&mut self, schema: &ModelSchema, record: &ResolvedRecord) -> Result<()> {
        (**self).accept(schema, record)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Progress display for a run.
///
/// Implementations must not fail: a broken progress display never aborts
/// an import.
pub trait ProgressReporter {
    /// Loading of `model` starts with `total` matching source records.
    fn start(&mut self, model: &str, total: usize);

    /// One more record of the current model was processed.
    fn advance(&mut self);

    /// The current model is done.
    fn finish(&mut self);
}
