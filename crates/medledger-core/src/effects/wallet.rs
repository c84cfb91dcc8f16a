//! Wallet effect interface
//!
//! # Effect Classification
//!
//! - **Category**: External Capability
//! - **Implementation**: browser wallet bindings (outside this workspace),
//!   `medledger-testkit` for scripted tests
//! - **Usage**: `SessionManager` only
//!
//! The wallet owns key material. The session layer only ever asks it for
//! accounts and for a [`SigningIdentity`] bound to one of them.
//!
//! Wallet notifications are delivered through an explicit subscription: the
//! subscriber hands the wallet a [`WalletEventSink`] per event kind and gets
//! back a [`SubscriptionId`] it must return on teardown.

use crate::errors::CapabilityError;
use crate::identifiers::{ChainId, WalletAddress};
use async_trait::async_trait;
use futures::channel::mpsc;
use std::fmt;

/// Capability used to authorize writes on behalf of one account
#[derive(Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    address: WalletAddress,
    handle: String,
}

impl SigningIdentity {
    /// Create a signing identity for an account
    ///
    /// `handle` is an opaque wallet-side reference; the session layer never
    /// interprets it.
    pub fn new(address: WalletAddress, handle: impl Into<String>) -> Self {
        Self {
            address,
            handle: handle.into(),
        }
    }

    /// Account this identity signs for
    pub fn address(&self) -> WalletAddress {
        self.address
    }

    /// Opaque wallet-side reference
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The handle may reference key material; keep it out of logs.
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Wallet notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletEventKind {
    /// The exposed account list changed
    AccountsChanged,
    /// The wallet switched chains
    ChainChanged,
}

impl WalletEventKind {
    /// Event name as used by injected browser wallets
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
        }
    }
}

/// Wallet notification payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// New account list; empty means the wallet disconnected
    AccountsChanged(Vec<WalletAddress>),
    /// New chain id
    ChainChanged(ChainId),
}

impl WalletEvent {
    /// Kind of this event
    pub fn kind(&self) -> WalletEventKind {
        match self {
            Self::AccountsChanged(_) => WalletEventKind::AccountsChanged,
            Self::ChainChanged(_) => WalletEventKind::ChainChanged,
        }
    }
}

/// Sending half handed to the wallet on subscribe
pub type WalletEventSink = mpsc::UnboundedSender<WalletEvent>;

/// Receiving half kept by the subscriber
pub type WalletEventStream = mpsc::UnboundedReceiver<WalletEvent>;

/// Handle for an active wallet subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Wallet capability
#[async_trait]
pub trait WalletEffects: Send + Sync {
    /// Request account access, prompting the user if needed
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, CapabilityError>;

    /// Currently exposed accounts, without prompting
    async fn list_accounts(&self) -> Result<Vec<WalletAddress>, CapabilityError>;

    /// Produce a signing identity for an exposed account
    async fn derive_signing_identity(
        &self,
        account: WalletAddress,
    ) -> Result<SigningIdentity, CapabilityError>;

    /// Register a sink for one event kind
    fn subscribe(
        &self,
        kind: WalletEventKind,
        sink: WalletEventSink,
    ) -> Result<SubscriptionId, CapabilityError>;

    /// Remove a previously registered sink, returning whether it was active
    fn unsubscribe(&self, kind: WalletEventKind, id: SubscriptionId) -> bool;
}
