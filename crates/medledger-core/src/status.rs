//! Operation status reporting
//!
//! Every dispatched call reports its progress to a [`StatusSink`]. Writes
//! report `Submitted` then `Confirmed` or `Failed`; reads report
//! `ReadCompleted` or `ReadFailed`. How a status is presented (toast, alert,
//! log line) is up to the sink.

use crate::effects::Receipt;
use crate::errors::LedgerError;
use crate::identifiers::TxHash;
use futures::channel::mpsc;
use std::sync::Arc;

/// Progress of a single dispatched call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Write accepted by the wallet and sent to the ledger
    Submitted {
        /// Operation name
        operation: String,
        /// Hash assigned at submission
        tx_hash: TxHash,
    },
    /// Write finalized by the ledger
    Confirmed {
        /// Operation name
        operation: String,
        /// Confirmation receipt
        receipt: Receipt,
    },
    /// Write failed at any stage
    Failed {
        /// Operation name
        operation: String,
        /// Typed failure
        error: LedgerError,
    },
    /// Read returned a value
    ReadCompleted {
        /// Operation name
        operation: String,
    },
    /// Read failed
    ReadFailed {
        /// Operation name
        operation: String,
        /// Typed failure
        error: LedgerError,
    },
}

impl OperationStatus {
    /// Operation this status belongs to
    pub fn operation(&self) -> &str {
        match self {
            Self::Submitted { operation, .. }
            | Self::Confirmed { operation, .. }
            | Self::Failed { operation, .. }
            | Self::ReadCompleted { operation }
            | Self::ReadFailed { operation, .. } => operation,
        }
    }

    /// Whether this status ends the call
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Submitted { .. })
    }

    /// Failure carried by this status, if any
    pub fn error(&self) -> Option<&LedgerError> {
        match self {
            Self::Failed { error, .. } | Self::ReadFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Destination for operation status updates
pub trait StatusSink: Send + Sync {
    /// Deliver a status update; must not block
    fn report(&self, status: OperationStatus);
}

/// Sink that drops every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
    fn report(&self, _status: OperationStatus) {}
}

impl StatusSink for mpsc::UnboundedSender<OperationStatus> {
    fn report(&self, status: OperationStatus) {
        // A closed receiver means nobody is rendering statuses anymore.
        let _ = self.unbounded_send(status);
    }
}

impl<S: StatusSink + ?Sized> StatusSink for Arc<S> {
    fn report(&self, status: OperationStatus) {
        (**self).report(status);
    }
}
