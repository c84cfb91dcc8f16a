//! Session manager
//!
//! Owns the [`Session`] and keeps it consistent with the wallet. Every
//! transition that changes the binding bumps a session epoch; work that was
//! started under an older epoch (a connect waiting on the approval prompt, a
//! rebind waiting on the wallet) discards its result when it resumes.

use super::{ConnectionState, PersistedFlag, Session, SessionBinding, SessionSnapshot};
use crate::config::AppConfig;
use futures::channel::mpsc;
use futures::StreamExt;
use futures_signals::signal::{Mutable, Signal};
use medledger_core::{
    CapabilityError, ChainId, LedgerEffects, LedgerError, LedgerHandle, Outcome, StorageEffects,
    SubscriptionId, WalletAddress, WalletEffects, WalletEvent, WalletEventKind, WalletEventStream,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct SessionState {
    binding: Option<SessionBinding>,
    persisted: bool,
    epoch: u64,
    connecting: usize,
    reload_required: Option<ChainId>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        let state = if self.connecting > 0 {
            ConnectionState::Connecting
        } else if self.binding.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        SessionSnapshot {
            state,
            address: self.binding.as_ref().map(SessionBinding::address),
            persisted: self.persisted,
            reload_required: self.reload_required.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveSubscriptions {
    accounts: SubscriptionId,
    chain: SubscriptionId,
}

/// Maintains exactly one session consistent with the wallet's real state
pub struct SessionManager {
    wallet: Option<Arc<dyn WalletEffects>>,
    ledger: Arc<dyn LedgerEffects>,
    flag: PersistedFlag,
    config: AppConfig,
    state: Mutex<SessionState>,
    snapshot: Mutable<SessionSnapshot>,
    subscriptions: Mutex<Option<ActiveSubscriptions>>,
}

impl SessionManager {
    /// Create a manager
    ///
    /// `wallet` is `None` when no wallet capability is present on this
    /// platform; every operation that needs it then fails with
    /// [`LedgerError::CapabilityUnavailable`] or is a no-op.
    pub fn new(
        config: AppConfig,
        wallet: Option<Arc<dyn WalletEffects>>,
        ledger: Arc<dyn LedgerEffects>,
        storage: Arc<dyn StorageEffects>,
    ) -> Self {
        let flag = PersistedFlag::new(storage, config.persistence_key.clone());
        Self {
            wallet,
            ledger,
            flag,
            config,
            state: Mutex::new(SessionState::default()),
            snapshot: Mutable::new(SessionSnapshot::default()),
            subscriptions: Mutex::new(None),
        }
    }

    /// Configuration this manager binds with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether a wallet capability is present
    pub fn is_wallet_available(&self) -> bool {
        self.wallet.is_some()
    }

    /// Current session
    pub fn session(&self) -> Session {
        let state = self.state.lock();
        Session {
            binding: state.binding.clone(),
            persisted: state.persisted,
        }
    }

    /// Ledger handle of the current binding
    ///
    /// Callers must fetch this immediately before each ledger call rather
    /// than keeping it across an await.
    pub fn ledger_handle(&self) -> Option<Arc<dyn LedgerHandle>> {
        self.state
            .lock()
            .binding
            .as_ref()
            .map(|binding| Arc::clone(binding.ledger()))
    }

    /// Current lifecycle state
    pub fn connection_state(&self) -> ConnectionState {
        self.state.lock().snapshot().state
    }

    /// Current observable summary
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.get_cloned()
    }

    /// Signal of observable summaries, for reactive frontends
    pub fn snapshot_signal(&self) -> impl Signal<Item = SessionSnapshot> {
        self.snapshot.signal_cloned()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Connect to the wallet, prompting the user for account access
    pub async fn connect(&self) -> Outcome<Session> {
        let Some(wallet) = self.wallet.clone() else {
            tracing::warn!("connect requested but no wallet is available");
            return Err(LedgerError::CapabilityUnavailable);
        };

        let epoch = self.begin_attempt();
        tracing::info!("requesting wallet account access");

        let binding = match self.request_binding(wallet.as_ref()).await {
            Ok(binding) => binding,
            Err(error) => {
                self.end_attempt();
                tracing::warn!(%error, "wallet connection failed");
                return Err(error);
            }
        };

        let address = binding.address();
        let Some(installed) = self.install(epoch, binding, true) else {
            tracing::warn!(address = %address, "session changed while connecting; discarding");
            return Err(LedgerError::connection_rejected(
                "session changed while connecting",
            ));
        };
        self.persist_after_bind(installed).await;

        tracing::info!(address = %address, "wallet connected");
        Ok(self.session())
    }

    /// Silently restore a previous connection at startup
    ///
    /// Best-effort: every failure falls back to a disconnected session. No
    /// wallet call is made unless the persisted flag is set.
    pub async fn try_restore(&self) -> Option<Session> {
        let Some(wallet) = self.wallet.clone() else {
            tracing::debug!("no wallet available; skipping restore");
            return None;
        };

        match self.flag.is_set().await {
            Ok(true) => self.mark_persisted(true),
            Ok(false) => {
                tracing::debug!("no persisted connection; skipping restore");
                return None;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to read persisted connection flag");
                return None;
            }
        }

        let epoch = self.begin_attempt();
        let accounts = match wallet.list_accounts().await {
            Ok(accounts) => accounts,
            Err(error) => {
                self.end_attempt();
                tracing::warn!(%error, "auto-connect failed");
                return None;
            }
        };

        let Some(account) = accounts.first().copied() else {
            self.end_attempt();
            self.clear_flag().await;
            tracing::info!("wallet exposes no accounts; cleared persisted connection");
            return None;
        };

        match self.bind(wallet.as_ref(), account).await {
            Ok(binding) => {
                let installed = self.install(epoch, binding, true)?;
                self.persist_after_bind(installed).await;
                tracing::info!(address = %account, "auto-connected");
                Some(self.session())
            }
            Err(error) => {
                self.end_attempt();
                tracing::warn!(address = %account, %error, "auto-connect failed");
                None
            }
        }
    }

    /// Drop the session and forget the connection
    pub async fn disconnect(&self) {
        let was_bound = self.destroy(None);
        self.clear_flag().await;
        tracing::info!(was_bound, "wallet disconnected");
    }

    // ========================================================================
    // Wallet events
    // ========================================================================

    /// React to a new account list from the wallet
    ///
    /// A non-empty list fully rebinds to its first account: the signing
    /// identity is re-derived and the ledger handle re-bound. An empty list
    /// destroys the session and clears the persisted flag.
    pub async fn on_accounts_changed(&self, accounts: Vec<WalletAddress>) {
        let Some(account) = accounts.first().copied() else {
            let was_bound = self.destroy(None);
            self.clear_flag().await;
            tracing::info!(was_bound, "wallet exposes no accounts; session dropped");
            return;
        };

        let Some(wallet) = self.wallet.clone() else {
            return;
        };

        let epoch = self.begin_rebind();
        tracing::info!(address = %account, "account changed; rebinding session");

        match self.bind(wallet.as_ref(), account).await {
            Ok(binding) => match self.install(epoch, binding, false) {
                Some(installed) => self.persist_after_bind(installed).await,
                None => tracing::debug!(address = %account, "discarding stale rebind"),
            },
            Err(error) => {
                tracing::warn!(address = %account, %error, "rebind failed; dropping session");
                if self.destroy_if_current(epoch) {
                    self.clear_flag().await;
                }
            }
        }
    }

    /// React to a chain switch
    ///
    /// Contract addresses and signing context are chain-specific, so the
    /// session is destroyed and the frontend must reload and reconnect. The
    /// persisted flag is kept so the reload restores silently.
    pub async fn on_chain_changed(&self, chain_id: ChainId) {
        let was_bound = self.destroy(Some(chain_id.clone()));
        match &self.config.expected_chain_id {
            Some(expected) if *expected != chain_id => tracing::warn!(
                expected = %expected,
                actual = %chain_id,
                was_bound,
                "wallet switched to an unexpected chain; session invalidated"
            ),
            _ => tracing::info!(
                chain = %chain_id,
                was_bound,
                "chain changed; session invalidated"
            ),
        }
    }

    /// Dispatch a wallet event to its handler
    pub async fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts).await,
            WalletEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id).await,
        }
    }

    /// Drive a subscription stream until the wallet closes it
    pub async fn run_events(&self, mut events: WalletEventStream) {
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
        tracing::debug!("wallet event stream closed");
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to account and chain changes
    ///
    /// Only one handler pair is active at a time: subscribing again tears
    /// down the previous pair first.
    pub fn subscribe(&self) -> Outcome<WalletEventStream> {
        let Some(wallet) = self.wallet.as_ref() else {
            return Err(LedgerError::CapabilityUnavailable);
        };
        self.teardown();

        let (sink, stream) = mpsc::unbounded();
        let accounts = wallet
            .subscribe(WalletEventKind::AccountsChanged, sink.clone())
            .map_err(connection_error)?;
        let chain = match wallet.subscribe(WalletEventKind::ChainChanged, sink) {
            Ok(id) => id,
            Err(error) => {
                wallet.unsubscribe(WalletEventKind::AccountsChanged, accounts);
                return Err(connection_error(error));
            }
        };

        *self.subscriptions.lock() = Some(ActiveSubscriptions { accounts, chain });
        tracing::debug!("subscribed to wallet events");
        Ok(stream)
    }

    /// Whether event handlers are registered
    pub fn is_subscribed(&self) -> bool {
        self.subscriptions.lock().is_some()
    }

    /// Unsubscribe both event handlers
    ///
    /// Idempotent; safe when never subscribed or when no wallet is present.
    pub fn teardown(&self) {
        let Some(active) = self.subscriptions.lock().take() else {
            return;
        };
        if let Some(wallet) = self.wallet.as_ref() {
            wallet.unsubscribe(WalletEventKind::AccountsChanged, active.accounts);
            wallet.unsubscribe(WalletEventKind::ChainChanged, active.chain);
        }
        tracing::debug!("unsubscribed from wallet events");
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn request_binding(&self, wallet: &dyn WalletEffects) -> Outcome<SessionBinding> {
        let accounts = wallet.request_accounts().await.map_err(connection_error)?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| LedgerError::connection_rejected("wallet returned no accounts"))?;
        self.bind(wallet, account).await.map_err(connection_error)
    }

    async fn bind(
        &self,
        wallet: &dyn WalletEffects,
        account: WalletAddress,
    ) -> Result<SessionBinding, CapabilityError> {
        let signer = wallet.derive_signing_identity(account).await?;
        let ledger = self.ledger.bind(self.config.contract_address, &signer)?;
        Ok(SessionBinding::new(signer, ledger))
    }

    fn publish(&self, state: &SessionState) {
        self.snapshot.set_neq(state.snapshot());
    }

    fn begin_attempt(&self) -> u64 {
        let mut state = self.state.lock();
        state.connecting += 1;
        self.publish(&state);
        state.epoch
    }

    fn end_attempt(&self) {
        let mut state = self.state.lock();
        state.connecting = state.connecting.saturating_sub(1);
        self.publish(&state);
    }

    /// Claim the session for a rebind. Connects, restores and rebinds that
    /// started earlier become stale, so the latest account list wins.
    fn begin_rebind(&self) -> u64 {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.epoch
    }

    /// Install a binding unless another transition happened since `epoch`.
    /// Returns the new epoch on success.
    fn install(&self, epoch: u64, binding: SessionBinding, attempt: bool) -> Option<u64> {
        let mut state = self.state.lock();
        if attempt {
            state.connecting = state.connecting.saturating_sub(1);
        }
        let installed = if state.epoch == epoch {
            state.binding = Some(binding);
            state.reload_required = None;
            state.epoch += 1;
            Some(state.epoch)
        } else {
            None
        };
        self.publish(&state);
        installed
    }

    /// Destroy the binding, returning whether one existed. Only a chain
    /// change leaves `reload_required` set.
    fn destroy(&self, reload_required: Option<ChainId>) -> bool {
        let mut state = self.state.lock();
        let was_bound = state.binding.take().is_some();
        state.epoch += 1;
        state.reload_required = reload_required;
        self.publish(&state);
        was_bound
    }

    fn destroy_if_current(&self, epoch: u64) -> bool {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return false;
        }
        state.binding = None;
        state.reload_required = None;
        state.epoch += 1;
        self.publish(&state);
        true
    }

    fn mark_persisted(&self, persisted: bool) {
        let mut state = self.state.lock();
        state.persisted = persisted;
        self.publish(&state);
    }

    /// Persist the flag for a binding installed at `installed`.
    ///
    /// If the binding was replaced or destroyed while the flag was being
    /// written, the later transition owns the flag. A chain change keeps it
    /// so the reload restores silently.
    async fn persist_after_bind(&self, installed: u64) {
        if let Err(error) = self.flag.set().await {
            tracing::warn!(%error, key = self.flag.key(), "failed to persist connection flag");
            return;
        }
        let keep = {
            let state = self.state.lock();
            state.epoch == installed || state.binding.is_some() || state.reload_required.is_some()
        };
        if keep {
            self.mark_persisted(true);
        } else {
            self.clear_flag().await;
        }
    }

    async fn clear_flag(&self) {
        if let Err(error) = self.flag.clear().await {
            tracing::warn!(%error, key = self.flag.key(), "failed to clear connection flag");
        }
        self.mark_persisted(false);
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("wallet_available", &self.wallet.is_some())
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

fn connection_error(error: CapabilityError) -> LedgerError {
    match error {
        CapabilityError::UserRejected { message } => LedgerError::connection_rejected(message),
        other => LedgerError::connection_rejected(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_state_precedence() {
        let mut state = SessionState::default();
        assert_eq!(state.snapshot().state, ConnectionState::Disconnected);

        state.connecting = 1;
        assert_eq!(state.snapshot().state, ConnectionState::Connecting);
    }

    #[test]
    fn test_connection_error_keeps_wallet_message() {
        assert_eq!(
            connection_error(CapabilityError::user_rejected("User rejected the request.")),
            LedgerError::connection_rejected("User rejected the request.")
        );
        assert_eq!(
            connection_error(CapabilityError::transport("offline")),
            LedgerError::connection_rejected("transport error: offline")
        );
    }
}
