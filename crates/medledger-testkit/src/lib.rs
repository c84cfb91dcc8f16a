//! Medledger Testing Infrastructure
//!
//! Scripted capabilities for exercising the session core without a browser
//! wallet or a deployed ledger.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```rust,ignore
//! let fixture = TestFixture::new();
//! let session = SessionManager::new(
//!     AppConfig::default(),
//!     Some(fixture.wallet_effects()),
//!     fixture.ledger_effects(),
//!     fixture.storage_effects(),
//! );
//! ```

pub mod ledger;
pub mod status;
pub mod storage;
pub mod wallet;

pub use ledger::{InMemoryLedger, SubmittedCall, NOT_OWNER};
pub use status::RecordingStatusSink;
pub use storage::GatedStorage;
pub use wallet::{RequestGate, ScriptedWallet, WalletCalls, USER_REJECTED_MESSAGE};

use medledger_core::{LedgerEffects, StorageEffects, WalletAddress, WalletEffects};
use medledger_effects::MemoryStorageHandler;
use std::sync::Arc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic test account whose last byte is `n`
pub fn test_address(n: u8) -> WalletAddress {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xa0;
    bytes[19] = n;
    WalletAddress::from_bytes(bytes)
}

/// Wallet, ledger and storage sharing state with the test
#[derive(Debug, Clone)]
pub struct TestFixture {
    /// Scripted wallet
    pub wallet: ScriptedWallet,
    /// In-memory ledger
    pub ledger: InMemoryLedger,
    /// Storage holding the persisted flag
    pub storage: MemoryStorageHandler,
}

impl TestFixture {
    /// Owner of the fixture ledger
    pub const OWNER: u8 = 1;

    /// Ledger owned by `test_address(OWNER)`, wallet approving the owner
    pub fn new() -> Self {
        let owner = test_address(Self::OWNER);
        Self {
            wallet: ScriptedWallet::with_accounts([owner]),
            ledger: InMemoryLedger::new(owner),
            storage: MemoryStorageHandler::new(),
        }
    }

    /// Replace the wallet
    pub fn with_wallet(mut self, wallet: ScriptedWallet) -> Self {
        self.wallet = wallet;
        self
    }

    /// Replace the storage
    pub fn with_storage(mut self, storage: MemoryStorageHandler) -> Self {
        self.storage = storage;
        self
    }

    /// Wallet as an effect handle
    pub fn wallet_effects(&self) -> Arc<dyn WalletEffects> {
        Arc::new(self.wallet.clone())
    }

    /// Ledger as an effect handle
    pub fn ledger_effects(&self) -> Arc<dyn LedgerEffects> {
        Arc::new(self.ledger.clone())
    }

    /// Storage as an effect handle
    pub fn storage_effects(&self) -> Arc<dyn StorageEffects> {
        Arc::new(self.storage.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
