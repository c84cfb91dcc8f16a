//! # Application Core
//!
//! [`AppCore`] wires the session manager, dispatcher and lookup facade
//! together from one [`AppConfig`] and the injected capabilities. Frontends
//! hold one `AppCore` for the lifetime of the page or process.

use crate::config::AppConfig;
use crate::dispatch::CallDispatcher;
use crate::lookup::LookupFacade;
use crate::session::SessionManager;
use medledger_core::{
    LedgerEffects, StatusSink, StorageEffects, WalletEffects, WalletEventStream,
};
use std::sync::Arc;

/// Headless application core
#[derive(Debug, Clone)]
pub struct AppCore {
    session: Arc<SessionManager>,
    dispatcher: CallDispatcher,
    lookup: LookupFacade,
}

impl AppCore {
    /// Build the core from its capabilities
    ///
    /// `wallet` is `None` when the platform has no wallet; the core still
    /// works but every connect fails with `CapabilityUnavailable`.
    pub fn new(
        config: AppConfig,
        wallet: Option<Arc<dyn WalletEffects>>,
        ledger: Arc<dyn LedgerEffects>,
        storage: Arc<dyn StorageEffects>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        tracing::debug!(
            contract = %config.contract_address,
            wallet_available = wallet.is_some(),
            "initializing app core"
        );
        let session = Arc::new(SessionManager::new(config, wallet, ledger, storage));
        let dispatcher = CallDispatcher::new(Arc::clone(&session), status);
        let lookup = LookupFacade::new(dispatcher.clone());
        Self {
            session,
            dispatcher,
            lookup,
        }
    }

    /// Build a browser core persisting the session flag in `localStorage`
    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    pub fn for_browser(
        config: AppConfig,
        wallet: Option<Arc<dyn WalletEffects>>,
        ledger: Arc<dyn LedgerEffects>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let storage = Arc::new(medledger_effects::LocalStorageHandler::new());
        Self::new(config, wallet, ledger, storage, status)
    }

    /// Configuration in effect
    pub fn config(&self) -> &AppConfig {
        self.session.config()
    }

    /// Session manager
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Write and read dispatcher
    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }

    /// Role and record lookups
    pub fn lookup(&self) -> &LookupFacade {
        &self.lookup
    }

    /// Process start: restore a previous connection, then subscribe to
    /// wallet events
    ///
    /// Returns the event stream for the frontend to drive with
    /// [`SessionManager::run_events`], or `None` when no wallet is present.
    pub async fn start(&self) -> Option<WalletEventStream> {
        self.session.try_restore().await;
        match self.session.subscribe() {
            Ok(events) => Some(events),
            Err(error) => {
                tracing::debug!(%error, "not subscribing to wallet events");
                None
            }
        }
    }

    /// Unsubscribe from wallet events
    pub fn shutdown(&self) {
        self.session.teardown();
    }
}
