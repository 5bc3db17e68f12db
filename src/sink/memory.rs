use parking_lot::Mutex;

use super::{CircuitRecord, RecordSink, SinkError};

/// Keeps records in process memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<CircuitRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<CircuitRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RecordSink for MemorySink {
    fn describe(&self) -> String {
        "in-memory (no database configured)".into()
    }

    fn insert(&self, record: &CircuitRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
