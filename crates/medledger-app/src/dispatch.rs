//! # Call Dispatcher
//!
//! Uniform execution of named ledger operations against the current session.
//!
//! Writes go submit → await confirmation → report; reads go query → report.
//! Every capability failure is translated into a [`LedgerError`] here, so
//! callers only ever see an [`Outcome`]. Nothing is retried: writes are not
//! idempotent at the ledger boundary.
//!
//! The ledger handle is read from the [`SessionManager`] immediately before
//! each capability call. A write that was already submitted keeps the handle
//! it was submitted through and resolves to whatever the ledger reports,
//! even if the session is destroyed while it is pending.

use crate::session::SessionManager;
use medledger_core::{
    CapabilityError, LedgerError, LedgerHandle, LedgerValue, NoopStatusSink, OperationStatus,
    Outcome, PendingOperation, Receipt, StatusSink,
};
use std::sync::Arc;

/// Executes write and read operations through the bound session
#[derive(Clone)]
pub struct CallDispatcher {
    session: Arc<SessionManager>,
    sink: Arc<dyn StatusSink>,
}

impl CallDispatcher {
    /// Create a dispatcher reporting to `sink`
    pub fn new(session: Arc<SessionManager>, sink: Arc<dyn StatusSink>) -> Self {
        Self { session, sink }
    }

    /// Create a dispatcher that discards status updates
    pub fn without_status(session: Arc<SessionManager>) -> Self {
        Self::new(session, Arc::new(NoopStatusSink))
    }

    /// Session this dispatcher reads its binding from
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Submit a named write and wait for its confirmation
    pub async fn submit_write(
        &self,
        operation: &str,
        args: Vec<LedgerValue>,
    ) -> Outcome<Receipt> {
        let pending = PendingOperation::write(operation, args);
        let result = self.execute_write(&pending).await;
        if let Err(error) = &result {
            tracing::warn!(operation = %pending.target, %error, "write failed");
            self.sink.report(OperationStatus::Failed {
                operation: pending.target.clone(),
                error: error.clone(),
            });
        }
        result
    }

    /// Invoke a named read
    pub async fn query_read(&self, operation: &str, args: Vec<LedgerValue>) -> Outcome<LedgerValue> {
        self.query_read_with(operation, args, Ok).await
    }

    /// Invoke a named read and project its value
    ///
    /// The projection runs before the status is reported, so a value that
    /// fails to decode is reported as a failed read.
    pub async fn query_read_with<T>(
        &self,
        operation: &str,
        args: Vec<LedgerValue>,
        project: impl FnOnce(LedgerValue) -> Outcome<T>,
    ) -> Outcome<T> {
        let pending = PendingOperation::read(operation, args);
        let result = self.execute_read(&pending).await.and_then(project);
        match &result {
            Ok(_) => {
                tracing::debug!(operation = %pending.target, "read completed");
                self.sink.report(OperationStatus::ReadCompleted {
                    operation: pending.target.clone(),
                });
            }
            Err(error) => {
                tracing::warn!(operation = %pending.target, %error, "read failed");
                self.sink.report(OperationStatus::ReadFailed {
                    operation: pending.target.clone(),
                    error: error.clone(),
                });
            }
        }
        result
    }

    async fn execute_write(&self, pending: &PendingOperation) -> Outcome<Receipt> {
        let ledger = self.bound_ledger()?;
        tracing::debug!(call = %pending, signer = %ledger.signer().address(), "submitting write");

        let transaction = ledger
            .submit(&pending.target, &pending.arguments)
            .await
            .map_err(submit_error)?;

        let tx_hash = transaction.tx_hash().clone();
        tracing::info!(operation = %pending.target, tx_hash = %tx_hash, "write submitted");
        self.sink.report(OperationStatus::Submitted {
            operation: pending.target.clone(),
            tx_hash,
        });

        let receipt = transaction
            .await_confirmation()
            .await
            .map_err(confirmation_error)?;

        tracing::info!(
            operation = %pending.target,
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            "write confirmed"
        );
        self.sink.report(OperationStatus::Confirmed {
            operation: pending.target.clone(),
            receipt: receipt.clone(),
        });
        Ok(receipt)
    }

    async fn execute_read(&self, pending: &PendingOperation) -> Outcome<LedgerValue> {
        let ledger = self.bound_ledger()?;
        tracing::trace!(call = %pending, "querying");
        ledger
            .query(&pending.target, &pending.arguments)
            .await
            .map_err(read_error)
    }

    fn bound_ledger(&self) -> Outcome<Arc<dyn LedgerHandle>> {
        self.session
            .ledger_handle()
            .ok_or(LedgerError::SessionAbsent)
    }
}

impl std::fmt::Debug for CallDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallDispatcher")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Translate a failure while obtaining the pending transaction
fn submit_error(error: CapabilityError) -> LedgerError {
    match error {
        CapabilityError::UserRejected { message } => LedgerError::rejected(message),
        CapabilityError::Reverted { reason } => LedgerError::Reverted { reason },
        CapabilityError::Transport { message } => LedgerError::network(message),
        CapabilityError::Provider { message } => LedgerError::reverted(message),
    }
}

/// Translate a failure while awaiting confirmation
fn confirmation_error(error: CapabilityError) -> LedgerError {
    match error {
        CapabilityError::Reverted { reason } => LedgerError::Reverted { reason },
        CapabilityError::Transport { message } => LedgerError::network(message),
        CapabilityError::UserRejected { message } | CapabilityError::Provider { message } => {
            if message.is_empty() {
                LedgerError::reverted_generic()
            } else {
                LedgerError::reverted(message)
            }
        }
    }
}

/// Translate a failed read
fn read_error(error: CapabilityError) -> LedgerError {
    match error {
        CapabilityError::Reverted { reason } => LedgerError::Reverted { reason },
        CapabilityError::Transport { message } => LedgerError::network(message),
        other => LedgerError::reverted(other.to_string()),
    }
}
