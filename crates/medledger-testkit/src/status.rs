//! Recording status sink

use medledger_core::{OperationStatus, StatusSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Status sink that keeps every update for later assertions
///
/// Clones share the recorded list.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusSink {
    statuses: Arc<Mutex<Vec<OperationStatus>>>,
}

impl RecordingStatusSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every update so far, in delivery order
    pub fn statuses(&self) -> Vec<OperationStatus> {
        self.statuses.lock().clone()
    }

    /// Updates for one operation
    pub fn for_operation(&self, operation: &str) -> Vec<OperationStatus> {
        self.statuses
            .lock()
            .iter()
            .filter(|status| status.operation() == operation)
            .cloned()
            .collect()
    }

    /// Forget recorded updates
    pub fn clear(&self) {
        self.statuses.lock().clear();
    }
}

impl StatusSink for RecordingStatusSink {
    fn report(&self, status: OperationStatus) {
        self.statuses.lock().push(status);
    }
}
