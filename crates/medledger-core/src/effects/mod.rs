//! Pure effect trait definitions
//!
//! This module defines **what** the session layer may ask of the outside
//! world; handlers define **how**.
//!
//! ## External Capabilities (implemented outside this workspace)
//! - **Wallet**: account access, account/chain events, signing identities
//! - **Ledger**: named write operations (pending transaction) and reads
//!
//! ## Infrastructure Effects (`medledger-effects`)
//! - **Storage**: the persisted "was connected" flag
//!
//! ## Testing Effects (`medledger-testkit`)
//! - Scripted wallet and in-memory ledger handlers
//!
//! All effect-using code is parameterized by these traits, so the same
//! session logic runs against a browser wallet, a native signer, or a test
//! script.

pub mod ledger;
pub mod storage;
pub mod wallet;

pub use ledger::{LedgerEffects, LedgerHandle, PendingTransaction, Receipt};
pub use storage::{StorageEffects, StorageError};
pub use wallet::{
    SigningIdentity, SubscriptionId, WalletEffects, WalletEvent, WalletEventKind, WalletEventSink,
    WalletEventStream,
};
