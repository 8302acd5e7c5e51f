//! Step recording.

use crate::types::TrajectoryRecord;

/// Sink for accepted integrator steps.
pub trait Recorder {
    fn record(&mut self, record: TrajectoryRecord);
}

/// In-memory recorder; the usual sink for a single run, drained into the
/// store once the flight terminates.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    records: Vec<TrajectoryRecord>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.records
    }
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, record: TrajectoryRecord) {
        self.records.push(record);
    }
}

/// Recorder that drops everything; for callers that only want metrics.
#[derive(Debug, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&mut self, _record: TrajectoryRecord) {}
}
