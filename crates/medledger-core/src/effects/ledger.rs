//! Ledger effect interface
//!
//! # Effect Classification
//!
//! - **Category**: External Capability
//! - **Implementation**: contract bindings (outside this workspace),
//!   `medledger-testkit` for an in-memory ledger
//! - **Usage**: `CallDispatcher` through the bound session
//!
//! A [`LedgerHandle`] is a ledger bound to exactly one [`SigningIdentity`].
//! Operations are addressed by name; their argument order and types are
//! fixed by the external ledger interface.

use super::wallet::SigningIdentity;
use crate::errors::CapabilityError;
use crate::identifiers::{TxHash, WalletAddress};
use crate::value::LedgerValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Confirmation receipt of a finalized write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the confirmed transaction
    pub tx_hash: TxHash,
    /// Block that included it, when the ledger reports one
    pub block_number: Option<u64>,
}

impl Receipt {
    /// Create a receipt
    pub fn new(tx_hash: TxHash, block_number: Option<u64>) -> Self {
        Self {
            tx_hash,
            block_number,
        }
    }
}

/// A submitted write awaiting confirmation
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    /// Hash assigned at submission
    fn tx_hash(&self) -> &TxHash;

    /// Wait until the ledger finalizes or refuses the write
    ///
    /// No timeout is applied; this resolves only when the ledger does.
    async fn await_confirmation(&self) -> Result<Receipt, CapabilityError>;
}

/// Ledger bound to a signing identity
#[async_trait]
pub trait LedgerHandle: Send + Sync {
    /// Identity writes are signed with
    fn signer(&self) -> &SigningIdentity;

    /// Submit a named write operation
    async fn submit(
        &self,
        operation: &str,
        args: &[LedgerValue],
    ) -> Result<Box<dyn PendingTransaction>, CapabilityError>;

    /// Invoke a named read operation
    async fn query(&self, operation: &str, args: &[LedgerValue])
        -> Result<LedgerValue, CapabilityError>;
}

/// Ledger capability factory
pub trait LedgerEffects: Send + Sync {
    /// Bind the contract at `contract` to a signing identity
    fn bind(
        &self,
        contract: WalletAddress,
        signer: &SigningIdentity,
    ) -> Result<Arc<dyn LedgerHandle>, CapabilityError>;
}
