/*
[INPUT]:  Pre-seeded session stores and scripted wallet connection changes
[OUTPUT]: Test results for logout, disconnect debounce, address binding, store sync
[POS]:    Integration tests - passive session reconciliation
[UPDATE]: When reconciliation rules or debounce timing change
*/

mod common;

use std::time::Duration;

use common::{OTHER_ADDRESS, TEST_ADDRESS, TEST_SIGNATURE, authenticator, lowercase, offline_client};
use nakarobo_adapter::{MockWallet, NoticeLevel, SessionState, SessionStore, WalletConnector};
use tokio::sync::broadcast::error::TryRecvError;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Let the reconciler observe pending changes without crossing the debounce window
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn signed_in_store(address: &str) -> SessionStore {
    let store = SessionStore::in_memory();
    store.set_session("jwt1", lowercase(address)).unwrap();
    store
}

#[tokio::test(start_paused = true)]
async fn test_logout_when_signed_out_is_noop() {
    let store = SessionStore::in_memory();
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let mut notices = auth.subscribe_notices();

    assert_ok!(auth.logout().await);
    assert_ok!(auth.logout().await);

    assert_eq!(auth.state(), SessionState::SignedOut);
    assert!(store.get_session().is_none());
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_account_switch_invalidates_session_once() {
    let store = signed_in_store(TEST_ADDRESS);
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let mut notices = auth.subscribe_notices();
    let shutdown = CancellationToken::new();
    let handle = auth.spawn_reconciler(shutdown.clone());

    settle().await;
    assert!(auth.is_authenticated());

    wallet.connect(OTHER_ADDRESS);
    settle().await;

    assert!(!auth.is_authenticated());
    assert!(store.get_session().is_none());
    // The new account stays connected
    assert_eq!(wallet.disconnect_calls(), 0);
    assert_eq!(wallet.state().address(), Some(lowercase(OTHER_ADDRESS).as_str()));

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "Account changed. Please sign in again.");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_address_compare_ignores_case() {
    let store = SessionStore::in_memory();
    store.set_session("jwt1", TEST_ADDRESS.to_uppercase()).unwrap();
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let shutdown = CancellationToken::new();
    auth.spawn_reconciler(shutdown.clone());

    settle().await;
    assert!(auth.is_authenticated());
    assert!(store.has_token());
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_blip_keeps_session() {
    let store = signed_in_store(TEST_ADDRESS);
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let mut authenticated = auth.subscribe_authenticated();
    let shutdown = CancellationToken::new();
    auth.spawn_reconciler(shutdown.clone());
    settle().await;
    let _ = authenticated.borrow_and_update();

    wallet.drop_connection();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(auth.is_authenticated());

    wallet.connect(TEST_ADDRESS);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(auth.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("jwt1"));
    assert!(!authenticated.has_changed().unwrap());
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_sustained_disconnect_clears_session() {
    let store = signed_in_store(TEST_ADDRESS);
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let mut notices = auth.subscribe_notices();
    let shutdown = CancellationToken::new();
    auth.spawn_reconciler(shutdown.clone());
    settle().await;

    wallet.drop_connection();
    tokio::time::sleep(Duration::from_millis(490)).await;
    assert!(auth.is_authenticated());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!auth.is_authenticated());
    assert!(store.get_session().is_none());
    assert_eq!(auth.state(), SessionState::SignedOut);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_without_session_is_silent() {
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(SessionStore::in_memory()), &wallet);
    let mut notices = auth.subscribe_notices();
    let shutdown = CancellationToken::new();
    auth.spawn_reconciler(shutdown.clone());
    settle().await;

    wallet.drop_connection();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!auth.is_authenticated());
    assert_eq!(notices.try_recv(), Err(TryRecvError::Empty));
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_logout_disconnects_wallet() {
    let store = signed_in_store(TEST_ADDRESS);
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let shutdown = CancellationToken::new();
    auth.spawn_reconciler(shutdown.clone());
    settle().await;

    assert_ok!(auth.logout().await);
    assert!(!auth.is_authenticated());
    assert!(store.get_session().is_none());
    assert_eq!(wallet.disconnect_calls(), 1);
    assert!(!wallet.state().is_connected());

    // The debounce that follows has nothing left to clear
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!auth.is_authenticated());
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_external_store_changes_are_followed() {
    let store = SessionStore::in_memory();
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let first = authenticator(offline_client(store.clone()), &wallet);
    let second = authenticator(offline_client(store.clone()), &wallet);
    let shutdown = CancellationToken::new();
    first.spawn_reconciler(shutdown.clone());
    second.spawn_reconciler(shutdown.clone());
    settle().await;

    // Another context signs in
    store.set_session("jwt1", lowercase(TEST_ADDRESS)).unwrap();
    settle().await;
    assert!(first.is_authenticated());
    assert!(second.is_authenticated());

    // A 401 elsewhere clears the shared credentials
    store.clear_session().unwrap();
    settle().await;
    assert!(!first.is_authenticated());
    assert!(!second.is_authenticated());
    shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_refresh_rereads_disk() {
    let dir = std::env::temp_dir().join(format!("nakarobo-session-{}", Uuid::new_v4()));
    let writer = SessionStore::open(&dir).unwrap();
    let reader = SessionStore::open(&dir).unwrap();

    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(reader), &wallet);
    assert!(!auth.is_authenticated());

    writer.set_session("jwt1", lowercase(TEST_ADDRESS)).unwrap();
    assert!(assert_ok!(auth.refresh()));

    writer.clear_session().unwrap();
    assert!(!assert_ok!(auth.refresh()));

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reconciler_stops_on_shutdown() {
    let store = signed_in_store(TEST_ADDRESS);
    let wallet = MockWallet::new(TEST_ADDRESS, TEST_SIGNATURE);
    let auth = authenticator(offline_client(store.clone()), &wallet);
    let shutdown = CancellationToken::new();
    let handle = auth.spawn_reconciler(shutdown.clone());
    settle().await;

    shutdown.cancel();
    handle.await.unwrap();

    // No reconciler: an account switch is no longer acted on
    wallet.connect(OTHER_ADDRESS);
    settle().await;
    assert!(store.has_token());
}
