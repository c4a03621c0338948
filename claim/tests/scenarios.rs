//! End-to-end claim scenarios against the nullable wallet.

use std::sync::Arc;
use std::time::Duration;

use faucet_claim::{
    ClaimController, ClaimError, ClaimStatus, FaucetConfig, IgnoreReason, Locale, Outcome,
};
use faucet_nullables::{ClaimScript, NullWallet};
use faucet_types::Address;
use faucet_wallet::{ErrorCode, ProviderError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn alice() -> Address {
    Address::parse("0x00000000000000000000000000000000000a11ce").unwrap()
}

fn bob() -> Address {
    Address::parse("0x0000000000000000000000000000000000000b0b").unwrap()
}

fn controller_with(wallet: &NullWallet) -> ClaimController<NullWallet> {
    ClaimController::new(Some(wallet.clone()), &FaucetConfig::default())
}

async fn connected_controller() -> (NullWallet, ClaimController<NullWallet>) {
    let wallet = NullWallet::new();
    wallet.approve_with(vec![alice()]);
    let controller = controller_with(&wallet);
    assert_eq!(controller.connect().await, Outcome::Done(alice()));
    (wallet, controller)
}

// ---------------------------------------------------------------------------
// Scenario A: no provider present
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_provider_yields_provider_unavailable() {
    let controller: ClaimController<NullWallet> =
        ClaimController::new(None, &FaucetConfig::default());

    assert_eq!(
        controller.connect().await,
        Outcome::Failed(ClaimError::ProviderUnavailable)
    );
    let view = controller.view();
    assert_eq!(view.account, None);
    assert_eq!(view.status, ClaimStatus::Failed);
    assert_eq!(
        view.message.as_deref(),
        Some("Please install MetaMask or another Ethereum wallet!")
    );
    assert!(controller.session().account_events().is_none());
}

// ---------------------------------------------------------------------------
// Scenario B: provider present, user approves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approved_connection_permits_claim() {
    let (wallet, controller) = connected_controller().await;

    let view = controller.view();
    assert_eq!(view.account, Some(alice()));
    assert_eq!(view.status, ClaimStatus::Idle);
    assert!(view.can_claim());
    assert_eq!(wallet.prompts(), 1);

    assert!(controller.attempt_claim().await.is_done());
}

// ---------------------------------------------------------------------------
// Scenario C: claim confirms
// ---------------------------------------------------------------------------

#[tokio::test]
async fn confirmed_claim_updates_cooldown_and_supply() {
    let (_wallet, controller) = connected_controller().await;
    let before = controller.view().remaining.tokens();

    let outcome = controller.attempt_claim().await;
    assert!(outcome.is_done());

    let view = controller.view();
    assert_eq!(view.status, ClaimStatus::Succeeded);
    assert_eq!(view.seconds_remaining, 60);
    assert_eq!(view.remaining.tokens(), before - 50);
    assert_eq!(
        view.message.as_deref(),
        Some("Success! Your tokens are on the way.")
    );
    assert!(!view.can_claim());
}

// ---------------------------------------------------------------------------
// Scenario D: gas estimation failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gas_estimation_failure_reports_prior_claim() {
    let (wallet, controller) = connected_controller().await;
    wallet.script(ClaimScript::RejectSubmit(ProviderError::new(
        ErrorCode::UnpredictableGasLimit,
        "cannot estimate gas; transaction may fail or may require manual gas limit",
    )));
    let before = controller.view().remaining;

    assert_eq!(
        controller.attempt_claim().await,
        Outcome::Failed(ClaimError::AlreadyClaimed)
    );
    let view = controller.view();
    assert_eq!(view.status, ClaimStatus::Failed);
    assert_eq!(view.remaining, before);
    assert_eq!(view.seconds_remaining, 0);
    let message = view.message.unwrap();
    assert!(message.contains("already claimed"));
    assert!(message.contains("60 seconds"));
}

// ---------------------------------------------------------------------------
// Scenario E: wallet disconnects mid-session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_account_event_clears_session() {
    let (wallet, controller) = connected_controller().await;
    let controller = Arc::new(controller);
    let listener = controller.spawn_account_listener().unwrap();
    let mut views = controller.subscribe();

    assert_eq!(wallet.emit_accounts(Vec::new()), 1);
    tokio::time::timeout(
        Duration::from_secs(5),
        views.wait_for(|v| v.account.is_none()),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(controller.session().signer().await.is_none());
    assert_eq!(
        controller.attempt_claim().await,
        Outcome::Failed(ClaimError::NoSignerConnected)
    );
    assert!(wallet.submitted().is_empty());
    listener.abort();
}

#[tokio::test]
async fn account_switch_claims_with_new_account() {
    let (wallet, controller) = connected_controller().await;

    assert_eq!(controller.handle_accounts_changed(&[bob()]).await, Some(bob()));
    assert_eq!(controller.view().account, Some(bob()));

    assert!(controller.attempt_claim().await.is_done());
    assert_eq!(wallet.submitted()[0].from, bob());
}

// ---------------------------------------------------------------------------
// At-most-one in flight
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_attempt_while_submitting_is_noop() {
    let (wallet, controller) = connected_controller().await;
    wallet.hold_confirmations();
    let mut views = controller.subscribe();

    let first = controller.attempt_claim();
    tokio::pin!(first);
    tokio::select! {
        _ = &mut first => panic!("confirmation is held"),
        seen = views.wait_for(|v| v.status == ClaimStatus::Submitting) => { seen.unwrap(); }
    }

    let snapshot = controller.view();
    assert_eq!(
        controller.attempt_claim().await,
        Outcome::Ignored(IgnoreReason::Busy)
    );
    assert_eq!(controller.view(), snapshot);
    assert_eq!(wallet.submitted().len(), 1);

    wallet.release_confirmation();
    assert!(first.await.is_done());
    assert_eq!(controller.view().status, ClaimStatus::Succeeded);
}

#[tokio::test]
async fn connect_while_submitting_is_ignored() {
    let (wallet, controller) = connected_controller().await;
    wallet.hold_confirmations();
    let mut views = controller.subscribe();

    let claim = controller.attempt_claim();
    tokio::pin!(claim);
    tokio::select! {
        _ = &mut claim => panic!("confirmation is held"),
        seen = views.wait_for(|v| v.busy) => { seen.unwrap(); }
    }

    assert_eq!(controller.connect().await, Outcome::Ignored(IgnoreReason::Busy));
    assert_eq!(wallet.prompts(), 1);

    wallet.release_confirmation();
    claim.await;
}

// ---------------------------------------------------------------------------
// Classification end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn on_chain_rate_limit_is_reported() {
    let (wallet, controller) = connected_controller().await;
    wallet.script(ClaimScript::RejectSubmit(ProviderError::new(
        ErrorCode::Rpc(3),
        "execution reverted: You must wait 60 seconds before requesting again",
    )));

    assert_eq!(
        controller.attempt_claim().await,
        Outcome::Failed(ClaimError::RateLimited)
    );
}

#[tokio::test]
async fn failures_are_not_retried() {
    let (wallet, controller) = connected_controller().await;
    wallet.script(ClaimScript::FailConfirmation(ProviderError::new(
        ErrorCode::Timeout,
        "transaction not confirmed",
    )));

    controller.attempt_claim().await;
    assert_eq!(wallet.submitted().len(), 1);

    assert!(controller.attempt_claim().await.is_done());
    assert_eq!(wallet.submitted().len(), 2);
}

#[tokio::test]
async fn indonesian_locale_messages() {
    let wallet = NullWallet::new();
    let config = FaucetConfig {
        locale: Locale::Id,
        ..Default::default()
    };
    let controller = ClaimController::new(Some(wallet), &config);

    assert_eq!(
        controller.attempt_claim().await,
        Outcome::Failed(ClaimError::NoSignerConnected)
    );
    assert!(controller
        .view()
        .message
        .unwrap()
        .starts_with("Tidak ada dompet yang terhubung"));
}
