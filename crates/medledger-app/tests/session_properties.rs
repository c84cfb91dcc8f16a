//! Property tests for the session binding invariant
//!
//! Whatever order connects, account switches, account clears and chain
//! changes arrive in, the signing identity and ledger handle are present or
//! absent together, and a bound session always signs for its own address.

#![allow(clippy::unwrap_used)]

use futures::executor::block_on;
use medledger_app::{AppConfig, ConnectionState, SessionManager};
use medledger_core::ChainId;
use medledger_testkit::{test_address, ScriptedWallet, TestFixture};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Connect,
    RejectedConnect,
    AccountsChanged(u8),
    AccountsCleared,
    ChainChanged(u8),
    Disconnect,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Connect),
        Just(Step::RejectedConnect),
        (2u8..6).prop_map(Step::AccountsChanged),
        Just(Step::AccountsCleared),
        (1u8..4).prop_map(Step::ChainChanged),
        Just(Step::Disconnect),
    ]
}

fn assert_consistent(session: &SessionManager) -> Result<(), TestCaseError> {
    let current = session.session();
    let signer = current.signing_identity();
    let ledger = current.ledger_handle();
    prop_assert_eq!(signer.is_some(), ledger.is_some());
    prop_assert_eq!(signer.is_some(), current.wallet_address().is_some());
    if let (Some(signer), Some(ledger)) = (signer, ledger) {
        prop_assert_eq!(ledger.signer().address(), signer.address());
        prop_assert_eq!(Some(signer.address()), current.wallet_address());
    }

    let snapshot = session.snapshot();
    prop_assert_eq!(snapshot.address, current.wallet_address());
    prop_assert_eq!(snapshot.state == ConnectionState::Connected, current.is_bound());
    Ok(())
}

proptest! {
    #[test]
    fn prop_binding_is_all_or_nothing(steps in proptest::collection::vec(step(), 1..24)) {
        let fixture = TestFixture::new()
            .with_wallet(ScriptedWallet::with_accounts([test_address(TestFixture::OWNER)]));
        let session = SessionManager::new(
            AppConfig::default(),
            Some(fixture.wallet_effects()),
            fixture.ledger_effects(),
            fixture.storage_effects(),
        );

        for step in steps {
            block_on(async {
                match step {
                    Step::Connect => {
                        fixture.wallet.approve_requests();
                        let _ = session.connect().await;
                    }
                    Step::RejectedConnect => {
                        fixture.wallet.reject_requests("denied");
                        let _ = session.connect().await;
                        fixture.wallet.approve_requests();
                    }
                    Step::AccountsChanged(n) => {
                        session.on_accounts_changed(vec![test_address(n)]).await;
                    }
                    Step::AccountsCleared => session.on_accounts_changed(Vec::new()).await,
                    Step::ChainChanged(n) => {
                        session.on_chain_changed(ChainId::new(n.to_string())).await;
                    }
                    Step::Disconnect => session.disconnect().await,
                }
            });
            assert_consistent(&session)?;
        }
    }

    #[test]
    fn prop_rejected_connect_never_changes_binding(switch_first in any::<bool>()) {
        let fixture = TestFixture::new();
        let session = SessionManager::new(
            AppConfig::default(),
            Some(fixture.wallet_effects()),
            fixture.ledger_effects(),
            fixture.storage_effects(),
        );
        block_on(async {
            if switch_first {
                session.connect().await.unwrap();
            }
        });
        let before = session.session().wallet_address();

        fixture.wallet.reject_requests("denied");
        let outcome = block_on(session.connect());

        prop_assert!(outcome.is_err());
        prop_assert_eq!(session.session().wallet_address(), before);
        assert_consistent(&session)?;
    }
}
