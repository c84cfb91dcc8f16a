//! # Session - Wallet Binding Lifecycle
//!
//! A [`Session`] is the single piece of shared mutable state in the core: the
//! account currently bound, the signing identity derived for it, and the
//! ledger handle bound to that identity.
//!
//! ## Invariant
//!
//! The signing identity and the ledger handle are created and destroyed
//! together. [`Session`] stores them in one [`SessionBinding`], so a session
//! either has both or neither.
//!
//! ## State Machine
//!
//! ```text
//!                connect()/try_restore()
//!  Disconnected ───────────────────────► Connecting
//!       ▲  ▲                                 │
//!       │  └──────────── failure ────────────┤
//!       │                                    │ success
//!       │   accountsChanged([]) /            ▼
//!       └── chainChanged / disconnect() ── Connected
//! ```
//!
//! [`SessionManager`] is the only writer. Dispatchers read the binding
//! immediately before each ledger call and never hold it across an await.

mod flag;
mod manager;

pub use flag::PersistedFlag;
pub use manager::SessionManager;

use medledger_core::{ChainId, LedgerHandle, SigningIdentity, WalletAddress};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Signing identity and ledger handle bound to one account
#[derive(Clone)]
pub struct SessionBinding {
    signer: SigningIdentity,
    ledger: Arc<dyn LedgerHandle>,
}

impl SessionBinding {
    pub(crate) fn new(signer: SigningIdentity, ledger: Arc<dyn LedgerHandle>) -> Self {
        Self { signer, ledger }
    }

    /// Bound account
    pub fn address(&self) -> WalletAddress {
        self.signer.address()
    }

    /// Signing identity for the bound account
    pub fn signer(&self) -> &SigningIdentity {
        &self.signer
    }

    /// Ledger handle bound to the signing identity
    pub fn ledger(&self) -> &Arc<dyn LedgerHandle> {
        &self.ledger
    }
}

impl fmt::Debug for SessionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBinding")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

/// Current wallet session
#[derive(Clone, Debug, Default)]
pub struct Session {
    binding: Option<SessionBinding>,
    persisted: bool,
}

impl Session {
    /// Whether a signing identity and ledger handle are bound
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Bound account, if any
    pub fn wallet_address(&self) -> Option<WalletAddress> {
        self.binding.as_ref().map(SessionBinding::address)
    }

    /// Signing identity, if bound
    pub fn signing_identity(&self) -> Option<&SigningIdentity> {
        self.binding.as_ref().map(SessionBinding::signer)
    }

    /// Ledger handle, if bound
    pub fn ledger_handle(&self) -> Option<&Arc<dyn LedgerHandle>> {
        self.binding.as_ref().map(SessionBinding::ledger)
    }

    /// The full binding, if any
    pub fn binding(&self) -> Option<&SessionBinding> {
        self.binding.as_ref()
    }

    /// Whether the "was connected" flag was set when this session was bound
    pub fn persisted(&self) -> bool {
        self.persisted
    }
}

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ConnectionState {
    /// No session bound, nothing pending
    #[default]
    Disconnected,
    /// A connect or restore is awaiting the wallet
    Connecting,
    /// A session is bound
    Connected,
}

/// Observable summary of the session for frontends
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    /// Lifecycle state
    pub state: ConnectionState,
    /// Bound account
    pub address: Option<WalletAddress>,
    /// Whether the "was connected" flag is set
    pub persisted: bool,
    /// Set when a chain change invalidated the session; cleared on the next
    /// successful bind or when the session is dropped for any other reason
    pub reload_required: Option<ChainId>,
}

impl SessionSnapshot {
    /// Whether a session is bound
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}
