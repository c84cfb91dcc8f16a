//! Session lifecycle tests
//!
//! Connect, silent restore, wallet event reconciliation and subscription
//! teardown against the scripted wallet.

#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use medledger_app::{
    AppConfig, AppCore, ConnectionState, LedgerError, SessionManager, DEFAULT_PERSISTENCE_KEY,
};
use medledger_core::{
    CapabilityError, ChainId, NoopStatusSink, StorageEffects, WalletEvent, WalletEventKind,
};
use medledger_effects::{FilesystemStorageHandler, MemoryStorageHandler};
use medledger_testkit::{
    init_test_tracing, test_address, GatedStorage, ScriptedWallet, TestFixture,
    USER_REJECTED_MESSAGE,
};
use std::sync::Arc;

fn session_for(fixture: &TestFixture) -> SessionManager {
    init_test_tracing();
    SessionManager::new(
        AppConfig::default(),
        Some(fixture.wallet_effects()),
        fixture.ledger_effects(),
        fixture.storage_effects(),
    )
}

async fn stored_flag(fixture: &TestFixture) -> Option<String> {
    fixture
        .storage
        .retrieve(DEFAULT_PERSISTENCE_KEY)
        .await
        .unwrap()
        .map(|bytes| String::from_utf8(bytes).unwrap())
}

fn remembered_storage() -> MemoryStorageHandler {
    MemoryStorageHandler::with_entries([(DEFAULT_PERSISTENCE_KEY, "true")])
}

// ============================================================================
// connect()
// ============================================================================

#[tokio::test]
async fn test_connect_without_wallet_is_capability_unavailable() {
    let fixture = TestFixture::new();
    let session = SessionManager::new(
        AppConfig::default(),
        None,
        fixture.ledger_effects(),
        fixture.storage_effects(),
    );

    assert_eq!(session.connect().await.unwrap_err(), LedgerError::CapabilityUnavailable);
    assert!(!session.session().is_bound());
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert_eq!(stored_flag(&fixture).await, None);
}

#[tokio::test]
async fn test_connect_binds_first_approved_account() {
    let fixture = TestFixture::new().with_wallet(ScriptedWallet::with_accounts([
        test_address(7),
        test_address(8),
    ]));
    let session = session_for(&fixture);

    let bound = session.connect().await.unwrap();

    assert_eq!(bound.wallet_address(), Some(test_address(7)));
    assert_eq!(
        bound.signing_identity().map(|s| s.address()),
        Some(test_address(7))
    );
    assert!(bound.ledger_handle().is_some());
    assert!(bound.persisted());
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));
    assert_eq!(fixture.ledger.bind_count(), 1);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, ConnectionState::Connected);
    assert_eq!(snapshot.address, Some(test_address(7)));
    assert!(snapshot.persisted);
}

#[tokio::test]
async fn test_connect_rejected_leaves_session_absent() {
    let fixture = TestFixture::new();
    fixture.wallet.reject_requests(USER_REJECTED_MESSAGE);
    let session = session_for(&fixture);

    assert_eq!(
        session.connect().await.unwrap_err(),
        LedgerError::connection_rejected(USER_REJECTED_MESSAGE)
    );
    assert!(!session.session().is_bound());
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert_eq!(stored_flag(&fixture).await, None);
    assert_eq!(fixture.ledger.bind_count(), 0);
}

#[tokio::test]
async fn test_connect_failure_keeps_existing_session() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();

    fixture
        .wallet
        .fail_requests(CapabilityError::transport("extension crashed"));
    assert_matches!(
        session.connect().await,
        Err(LedgerError::ConnectionRejected { .. })
    );

    assert_eq!(
        session.session().wallet_address(),
        Some(test_address(TestFixture::OWNER))
    );
    assert_eq!(session.connection_state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_connect_with_no_accounts_is_rejected() {
    let fixture = TestFixture::new().with_wallet(ScriptedWallet::new());
    let session = session_for(&fixture);

    assert_eq!(
        session.connect().await.unwrap_err(),
        LedgerError::connection_rejected("wallet returned no accounts")
    );
    assert_eq!(fixture.wallet.calls().derive_signing_identity, 0);
}

#[tokio::test]
async fn test_connect_discarded_when_accounts_cleared_during_prompt() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    let gate = fixture.wallet.pause_next_request();

    let (outcome, ()) = futures::join!(session.connect(), async {
        assert_eq!(session.connection_state(), ConnectionState::Connecting);
        session.on_accounts_changed(Vec::new()).await;
        gate.release();
    });

    assert_eq!(
        outcome.unwrap_err(),
        LedgerError::connection_rejected("session changed while connecting")
    );
    assert!(!session.session().is_bound());
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert_eq!(stored_flag(&fixture).await, None);
}

// ============================================================================
// try_restore()
// ============================================================================

#[tokio::test]
async fn test_restore_without_flag_makes_no_wallet_calls() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(3)]));
    let session = session_for(&fixture);

    assert!(session.try_restore().await.is_none());
    assert_eq!(fixture.wallet.calls().total(), 0);
    assert!(!session.session().is_bound());
}

#[tokio::test]
async fn test_restore_ignores_flag_values_other_than_true() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(3)]))
        .with_storage(MemoryStorageHandler::with_entries([(
            DEFAULT_PERSISTENCE_KEY,
            "yes",
        )]));
    let session = session_for(&fixture);

    assert!(session.try_restore().await.is_none());
    assert_eq!(fixture.wallet.calls().total(), 0);
}

#[tokio::test]
async fn test_restore_with_zero_accounts_clears_flag() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::new())
        .with_storage(remembered_storage());
    let session = session_for(&fixture);

    assert!(session.try_restore().await.is_none());
    assert!(!session.session().is_bound());
    assert_eq!(stored_flag(&fixture).await, None);
    assert!(!session.snapshot().persisted);
}

#[tokio::test]
async fn test_restore_binds_silently() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(3)]))
        .with_storage(remembered_storage());
    let session = session_for(&fixture);

    let restored = session.try_restore().await.unwrap();

    assert_eq!(restored.wallet_address(), Some(test_address(3)));
    assert_eq!(fixture.wallet.calls().request_accounts, 0);
    assert_eq!(fixture.wallet.calls().list_accounts, 1);
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));
}

#[tokio::test]
async fn test_restore_failure_is_swallowed() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(3)]))
        .with_storage(remembered_storage());
    fixture
        .wallet
        .fail_list_accounts(CapabilityError::transport("provider not ready"));
    let session = session_for(&fixture);

    assert!(session.try_restore().await.is_none());
    assert!(!session.session().is_bound());
    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_flag_survives_restart_on_disk() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let wallet = ScriptedWallet::with_accounts([test_address(6)]);
    let ledger = TestFixture::new().ledger;
    let start = |storage: FilesystemStorageHandler| {
        SessionManager::new(
            AppConfig::default(),
            Some(Arc::new(wallet.clone())),
            Arc::new(ledger.clone()),
            Arc::new(storage),
        )
    };

    let first = start(FilesystemStorageHandler::new(dir.path()));
    first.connect().await.unwrap();
    drop(first);

    let second = start(FilesystemStorageHandler::new(dir.path()));
    let restored = second.try_restore().await.unwrap();
    assert_eq!(restored.wallet_address(), Some(test_address(6)));
    assert_eq!(wallet.calls().request_accounts, 1);
}

#[tokio::test]
async fn test_restore_without_wallet_is_noop() {
    let fixture = TestFixture::new().with_storage(remembered_storage());
    let session = SessionManager::new(
        AppConfig::default(),
        None,
        fixture.ledger_effects(),
        fixture.storage_effects(),
    );

    assert!(session.try_restore().await.is_none());
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));
}

// ============================================================================
// Wallet events
// ============================================================================

#[tokio::test]
async fn test_account_switch_fully_rebinds() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();
    let derived_before = fixture.wallet.calls().derive_signing_identity;

    session.on_accounts_changed(vec![test_address(9)]).await;

    let current = session.session();
    assert_eq!(current.wallet_address(), Some(test_address(9)));
    assert_eq!(
        current.ledger_handle().map(|h| h.signer().address()),
        Some(test_address(9))
    );
    assert_eq!(
        fixture.wallet.calls().derive_signing_identity,
        derived_before + 1
    );
    assert_eq!(fixture.wallet.calls().request_accounts, 1);
    assert_eq!(fixture.ledger.bind_count(), 2);
}

#[tokio::test]
async fn test_empty_account_list_destroys_session() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();

    session.on_accounts_changed(Vec::new()).await;

    let current = session.session();
    assert!(!current.is_bound());
    assert!(current.signing_identity().is_none());
    assert!(current.ledger_handle().is_none());
    assert_eq!(stored_flag(&fixture).await, None);
}

#[tokio::test]
async fn test_failed_rebind_destroys_session() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();

    fixture
        .wallet
        .fail_derive(CapabilityError::provider("account locked"));
    session.on_accounts_changed(vec![test_address(9)]).await;

    assert!(!session.session().is_bound());
    assert_eq!(stored_flag(&fixture).await, None);
}

#[tokio::test]
async fn test_chain_change_requires_fresh_connect() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();

    session.on_chain_changed(ChainId::new("0x5")).await;

    assert!(!session.session().is_bound());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, ConnectionState::Disconnected);
    assert_eq!(snapshot.reload_required, Some(ChainId::new("5")));
    // The flag survives so the reload restores silently.
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));

    session.connect().await.unwrap();
    assert_eq!(session.snapshot().reload_required, None);
}

#[tokio::test]
async fn test_disconnect_clears_flag_and_is_idempotent() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();

    session.disconnect().await;
    session.disconnect().await;

    assert!(!session.session().is_bound());
    assert_eq!(stored_flag(&fixture).await, None);
}

#[tokio::test]
async fn test_account_switch_during_restore_wins() {
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(1)]))
        .with_storage(remembered_storage());
    let session = session_for(&fixture);
    let restore_gate = fixture.wallet.pause_derive(test_address(1));
    let switch_gate = fixture.wallet.pause_derive(test_address(2));

    let (restored, (), ()) = futures::join!(
        session.try_restore(),
        async {
            fixture.wallet.set_exposed([test_address(2)]);
            session.on_accounts_changed(vec![test_address(2)]).await;
        },
        async {
            // The older restore resolves first.
            restore_gate.release();
            switch_gate.release();
        }
    );

    assert!(restored.is_none());
    assert_eq!(session.session().wallet_address(), Some(test_address(2)));
    assert_eq!(
        session
            .session()
            .signing_identity()
            .map(|signer| signer.address()),
        Some(test_address(2))
    );
    assert_eq!(session.connection_state(), ConnectionState::Connected);
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));
}

#[tokio::test]
async fn test_connect_superseded_by_account_switch() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    let connect_gate = fixture.wallet.pause_derive(test_address(TestFixture::OWNER));

    let (outcome, ()) = futures::join!(session.connect(), async {
        session.on_accounts_changed(vec![test_address(5)]).await;
        connect_gate.release();
    });

    assert_eq!(
        outcome.unwrap_err(),
        LedgerError::connection_rejected("session changed while connecting")
    );
    assert_eq!(session.session().wallet_address(), Some(test_address(5)));
}

fn gated_session(fixture: &TestFixture) -> (SessionManager, GatedStorage) {
    init_test_tracing();
    let storage = GatedStorage::new(fixture.storage.clone());
    let session = SessionManager::new(
        AppConfig::default(),
        Some(fixture.wallet_effects()),
        fixture.ledger_effects(),
        Arc::new(storage.clone()),
    );
    (session, storage)
}

#[tokio::test]
async fn test_chain_change_while_flag_is_written_keeps_flag() {
    let fixture = TestFixture::new();
    let (session, storage) = gated_session(&fixture);
    let gate = storage.pause_next_store();

    let (connected, ()) = futures::join!(session.connect(), async {
        session.on_chain_changed(ChainId::new("0x5")).await;
        gate.release();
    });

    assert!(connected.is_ok());
    assert!(!session.session().is_bound());
    assert_eq!(stored_flag(&fixture).await.as_deref(), Some("true"));
    let snapshot = session.snapshot();
    assert!(snapshot.persisted);
    assert_eq!(snapshot.reload_required, Some(ChainId::new("5")));
}

#[tokio::test]
async fn test_disconnect_while_flag_is_written_clears_flag() {
    let fixture = TestFixture::new();
    let (session, storage) = gated_session(&fixture);
    let gate = storage.pause_next_store();

    let (connected, ()) = futures::join!(session.connect(), async {
        session.disconnect().await;
        gate.release();
    });

    assert!(connected.is_ok());
    assert!(!session.session().is_bound());
    assert_eq!(stored_flag(&fixture).await, None);
    assert!(!session.snapshot().persisted);
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscribe_keeps_single_handler_pair() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);

    let _first = session.subscribe().unwrap();
    let _second = session.subscribe().unwrap();

    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::AccountsChanged), 1);
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::ChainChanged), 1);
    assert!(session.is_subscribed());
}

#[tokio::test]
async fn test_teardown_is_idempotent_and_safe_when_never_subscribed() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.teardown();
    assert_eq!(fixture.wallet.calls().unsubscribe, 0);

    let _events = session.subscribe().unwrap();
    session.teardown();
    session.teardown();

    assert!(!session.is_subscribed());
    assert_eq!(fixture.wallet.calls().unsubscribe, 2);
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::AccountsChanged), 0);

    let unavailable = SessionManager::new(
        AppConfig::default(),
        None,
        fixture.ledger_effects(),
        fixture.storage_effects(),
    );
    unavailable.teardown();
    assert_eq!(unavailable.subscribe().unwrap_err(), LedgerError::CapabilityUnavailable);
}

#[tokio::test]
async fn test_dropping_manager_unsubscribes() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    let _events = session.subscribe().unwrap();

    drop(session);

    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::AccountsChanged), 0);
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::ChainChanged), 0);
}

#[tokio::test]
async fn test_partial_subscribe_failure_rolls_back() {
    let fixture = TestFixture::new();
    fixture.wallet.fail_subscribe(
        WalletEventKind::ChainChanged,
        CapabilityError::provider("unsupported event"),
    );
    let session = session_for(&fixture);

    assert_matches!(session.subscribe(), Err(LedgerError::ConnectionRejected { .. }));
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::AccountsChanged), 0);
    assert!(!session.is_subscribed());
}

#[tokio::test]
async fn test_run_events_applies_wallet_events_in_order() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    session.connect().await.unwrap();
    let events = session.subscribe().unwrap();

    fixture
        .wallet
        .emit(WalletEvent::AccountsChanged(vec![test_address(4)]));
    fixture
        .wallet
        .emit(WalletEvent::ChainChanged(ChainId::new("0xaa36a7")));
    session.teardown();
    session.run_events(events).await;

    assert!(!session.session().is_bound());
    assert_eq!(
        session.snapshot().reload_required,
        Some(ChainId::new("11155111"))
    );
    assert_eq!(fixture.wallet.calls().derive_signing_identity, 2);
}

#[tokio::test]
async fn test_snapshot_signal_tracks_connection() {
    let fixture = TestFixture::new();
    let session = session_for(&fixture);
    let mut snapshots = session.snapshot_signal().to_stream();

    assert_eq!(
        snapshots.next().await.map(|s| s.state),
        Some(ConnectionState::Disconnected)
    );

    session.connect().await.unwrap();
    let connected = snapshots.next().await.unwrap();
    assert!(connected.is_connected());
    assert_eq!(connected.address, Some(test_address(TestFixture::OWNER)));
}

// ============================================================================
// AppCore
// ============================================================================

#[tokio::test]
async fn test_app_core_start_restores_and_subscribes() {
    init_test_tracing();
    let fixture = TestFixture::new()
        .with_wallet(ScriptedWallet::already_connected([test_address(5)]))
        .with_storage(remembered_storage());
    let core = AppCore::new(
        AppConfig::default(),
        Some(fixture.wallet_effects()),
        fixture.ledger_effects(),
        fixture.storage_effects(),
        Arc::new(NoopStatusSink),
    );

    let events = core.start().await;

    assert!(events.is_some());
    assert_eq!(core.session().session().wallet_address(), Some(test_address(5)));
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::ChainChanged), 1);

    core.shutdown();
    assert_eq!(fixture.wallet.subscriber_count(WalletEventKind::ChainChanged), 0);
}

#[tokio::test]
async fn test_app_core_events_drive_shared_session() {
    init_test_tracing();
    let fixture = TestFixture::new();
    let core = AppCore::new(
        AppConfig::default(),
        Some(fixture.wallet_effects()),
        fixture.ledger_effects(),
        fixture.storage_effects(),
        Arc::new(NoopStatusSink),
    );
    let events = core.start().await.unwrap();
    core.session().connect().await.unwrap();

    let session = Arc::clone(core.session());
    fixture
        .wallet
        .emit(WalletEvent::AccountsChanged(vec![test_address(4)]));
    core.shutdown();
    session.run_events(events).await;

    assert_eq!(core.session().session().wallet_address(), Some(test_address(4)));
}

#[tokio::test]
async fn test_app_core_without_wallet_starts_disconnected() {
    let fixture = TestFixture::new();
    let core = AppCore::new(
        AppConfig::default(),
        None,
        fixture.ledger_effects(),
        fixture.storage_effects(),
        Arc::new(NoopStatusSink),
    );

    assert!(core.start().await.is_none());
    assert!(!core.session().is_wallet_available());
    assert_eq!(core.config().persistence_key, DEFAULT_PERSISTENCE_KEY);
}
