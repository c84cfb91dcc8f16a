//! Medledger Core - Ledger Session Foundation
//!
//! This crate provides the foundational types and effect interfaces shared by
//! every Medledger frontend. It contains only value types and pure trait
//! signatures; it never talks to a wallet or a ledger itself.
//!
//! # Architecture Layers
//!
//! ## Value Types
//! - [`WalletAddress`]: 20-byte account identity with a zero sentinel
//! - [`LedgerValue`]: dynamic value crossing the ledger boundary
//! - [`Receipt`], [`TxHash`]: write confirmation artifacts
//! - [`OperationStatus`], [`StatusSink`]: per-call progress reporting
//!
//! ## Effect Interfaces (Pure Signatures)
//! - [`WalletEffects`]: account access, event subscription, signing identity
//! - [`LedgerEffects`] / [`LedgerHandle`]: named write/read operations
//! - [`StorageEffects`]: persisted "was connected" flag
//!
//! ## Errors
//! - [`CapabilityError`]: what external capabilities report
//! - [`LedgerError`]: the typed failure carried by every [`Outcome`]

#![forbid(unsafe_code)]

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Capability and outcome error taxonomy
pub mod errors;

/// Account, chain and transaction identifiers
pub mod identifiers;

/// Pending operation descriptors
pub mod operation;

/// Operation status reporting
pub mod status;

/// Dynamic ledger values
pub mod value;

pub use effects::{
    LedgerEffects, LedgerHandle, PendingTransaction, Receipt, SigningIdentity, StorageEffects,
    StorageError, SubscriptionId, WalletEffects, WalletEvent, WalletEventKind, WalletEventSink,
    WalletEventStream,
};
pub use errors::{CapabilityError, FailureCause, LedgerError, Outcome};
pub use identifiers::{AddressParseError, ChainId, TxHash, WalletAddress};
pub use operation::{OperationKind, PendingOperation};
pub use status::{NoopStatusSink, OperationStatus, StatusSink};
pub use value::LedgerValue;
