//! Scripted wallet
//!
//! A [`WalletEffects`] implementation whose behavior is set by the test:
//! which accounts the user approves, whether prompts are rejected, and which
//! events fire. Every capability call is counted so tests can assert that a
//! code path made no wallet calls at all.

use async_trait::async_trait;
use futures::channel::oneshot;
use medledger_core::{
    CapabilityError, SigningIdentity, SubscriptionId, WalletAddress, WalletEffects, WalletEvent,
    WalletEventKind, WalletEventSink,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Message a browser wallet uses when the user closes the approval prompt
pub const USER_REJECTED_MESSAGE: &str = "User rejected the request.";

/// Capability calls observed by a [`ScriptedWallet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletCalls {
    /// `request_accounts` calls
    pub request_accounts: usize,
    /// `list_accounts` calls
    pub list_accounts: usize,
    /// `derive_signing_identity` calls
    pub derive_signing_identity: usize,
    /// `subscribe` calls
    pub subscribe: usize,
    /// `unsubscribe` calls
    pub unsubscribe: usize,
}

impl WalletCalls {
    /// Sum of all calls
    pub fn total(&self) -> usize {
        self.request_accounts
            + self.list_accounts
            + self.derive_signing_identity
            + self.subscribe
            + self.unsubscribe
    }
}

#[derive(Default)]
struct WalletScript {
    approvable: Vec<WalletAddress>,
    exposed: Vec<WalletAddress>,
    reject_requests: Option<String>,
    request_failure: Option<CapabilityError>,
    list_failure: Option<CapabilityError>,
    derive_failure: Option<CapabilityError>,
    subscribe_failure: Option<(WalletEventKind, CapabilityError)>,
    request_gate: Option<oneshot::Receiver<()>>,
    derive_gates: HashMap<WalletAddress, oneshot::Receiver<()>>,
    sinks: HashMap<WalletEventKind, Vec<(SubscriptionId, WalletEventSink)>>,
    next_subscription: u64,
    next_identity: u64,
    calls: WalletCalls,
}

/// Wallet driven by the test
///
/// Clones share state: hand one clone to the session and script the other.
#[derive(Clone, Default)]
pub struct ScriptedWallet {
    script: Arc<Mutex<WalletScript>>,
}

/// Releases a paused wallet call
#[derive(Debug)]
pub struct RequestGate {
    release: oneshot::Sender<()>,
}

impl RequestGate {
    pub(crate) fn new(release: oneshot::Sender<()>) -> Self {
        Self { release }
    }

    /// Let the paused request resolve
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

impl ScriptedWallet {
    /// Wallet with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet whose user approves `accounts` when prompted
    pub fn with_accounts(accounts: impl IntoIterator<Item = WalletAddress>) -> Self {
        let wallet = Self::new();
        wallet.script.lock().approvable = accounts.into_iter().collect();
        wallet
    }

    /// Wallet that already exposes `accounts` without a prompt, as after a
    /// previous session
    pub fn already_connected(accounts: impl IntoIterator<Item = WalletAddress>) -> Self {
        let accounts: Vec<_> = accounts.into_iter().collect();
        let wallet = Self::new();
        {
            let mut script = wallet.script.lock();
            script.approvable.clone_from(&accounts);
            script.exposed = accounts;
        }
        wallet
    }

    /// Reject every account prompt with `message`
    pub fn reject_requests(&self, message: impl Into<String>) {
        self.script.lock().reject_requests = Some(message.into());
    }

    /// Approve account prompts again
    pub fn approve_requests(&self) {
        self.script.lock().reject_requests = None;
    }

    /// Fail account prompts with a capability error
    pub fn fail_requests(&self, error: CapabilityError) {
        self.script.lock().request_failure = Some(error);
    }

    /// Fail `list_accounts` with a capability error
    pub fn fail_list_accounts(&self, error: CapabilityError) {
        self.script.lock().list_failure = Some(error);
    }

    /// Fail signing identity derivation
    pub fn fail_derive(&self, error: CapabilityError) {
        self.script.lock().derive_failure = Some(error);
    }

    /// Allow signing identity derivation again
    pub fn allow_derive(&self) {
        self.script.lock().derive_failure = None;
    }

    /// Fail subscriptions for one event kind
    pub fn fail_subscribe(&self, kind: WalletEventKind, error: CapabilityError) {
        self.script.lock().subscribe_failure = Some((kind, error));
    }

    /// Replace the accounts currently exposed, without notifying anyone
    pub fn set_exposed(&self, accounts: impl IntoIterator<Item = WalletAddress>) {
        self.script.lock().exposed = accounts.into_iter().collect();
    }

    /// Pause the next `request_accounts` until the gate is released
    pub fn pause_next_request(&self) -> RequestGate {
        let (release, wait) = oneshot::channel();
        self.script.lock().request_gate = Some(wait);
        RequestGate { release }
    }

    /// Pause the next signing identity derivation for `account` until the
    /// gate is released
    pub fn pause_derive(&self, account: WalletAddress) -> RequestGate {
        let (release, wait) = oneshot::channel();
        self.script.lock().derive_gates.insert(account, wait);
        RequestGate { release }
    }

    /// Deliver an event to every subscriber of its kind
    ///
    /// An accounts event also updates the exposed accounts. Returns the
    /// number of sinks that received it.
    pub fn emit(&self, event: WalletEvent) -> usize {
        let mut script = self.script.lock();
        if let WalletEvent::AccountsChanged(accounts) = &event {
            script.exposed.clone_from(accounts);
        }
        let Some(sinks) = script.sinks.get(&event.kind()) else {
            return 0;
        };
        sinks
            .iter()
            .filter(|(_, sink)| sink.unbounded_send(event.clone()).is_ok())
            .count()
    }

    /// Active subscriptions for one event kind
    pub fn subscriber_count(&self, kind: WalletEventKind) -> usize {
        self.script.lock().sinks.get(&kind).map_or(0, Vec::len)
    }

    /// Calls observed so far
    pub fn calls(&self) -> WalletCalls {
        self.script.lock().calls
    }
}

impl std::fmt::Debug for ScriptedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let script = self.script.lock();
        f.debug_struct("ScriptedWallet")
            .field("exposed", &script.exposed)
            .field("calls", &script.calls)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletEffects for ScriptedWallet {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, CapabilityError> {
        let gate = {
            let mut script = self.script.lock();
            script.calls.request_accounts += 1;
            script.request_gate.take()
        };
        if let Some(gate) = gate {
            // A dropped gate resolves the prompt as well.
            let _ = gate.await;
        }

        let mut script = self.script.lock();
        if let Some(error) = script.request_failure.clone() {
            return Err(error);
        }
        if let Some(message) = script.reject_requests.clone() {
            return Err(CapabilityError::user_rejected(message));
        }
        script.exposed = script.approvable.clone();
        tracing::trace!(accounts = script.exposed.len(), "scripted wallet approved request");
        Ok(script.exposed.clone())
    }

    async fn list_accounts(&self) -> Result<Vec<WalletAddress>, CapabilityError> {
        let mut script = self.script.lock();
        script.calls.list_accounts += 1;
        match script.list_failure.clone() {
            Some(error) => Err(error),
            None => Ok(script.exposed.clone()),
        }
    }

    async fn derive_signing_identity(
        &self,
        account: WalletAddress,
    ) -> Result<SigningIdentity, CapabilityError> {
        let gate = {
            let mut script = self.script.lock();
            script.calls.derive_signing_identity += 1;
            script.derive_gates.remove(&account)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut script = self.script.lock();
        if let Some(error) = script.derive_failure.clone() {
            return Err(error);
        }
        script.next_identity += 1;
        Ok(SigningIdentity::new(
            account,
            format!("scripted-signer-{}", script.next_identity),
        ))
    }

    fn subscribe(
        &self,
        kind: WalletEventKind,
        sink: WalletEventSink,
    ) -> Result<SubscriptionId, CapabilityError> {
        let mut script = self.script.lock();
        script.calls.subscribe += 1;
        if let Some((failing, error)) = &script.subscribe_failure {
            if *failing == kind {
                return Err(error.clone());
            }
        }
        script.next_subscription += 1;
        let id = SubscriptionId(script.next_subscription);
        script.sinks.entry(kind).or_default().push((id, sink));
        Ok(id)
    }

    fn unsubscribe(&self, kind: WalletEventKind, id: SubscriptionId) -> bool {
        let mut script = self.script.lock();
        script.calls.unsubscribe += 1;
        let Some(sinks) = script.sinks.get_mut(&kind) else {
            return false;
        };
        let before = sinks.len();
        sinks.retain(|(active, _)| *active != id);
        sinks.len() != before
    }
}
