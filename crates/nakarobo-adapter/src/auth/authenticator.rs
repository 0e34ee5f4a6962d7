/*
[INPUT]:  API client, wallet connector, session store
[OUTPUT]: Signed-in session bound to the connected wallet address
[POS]:    Auth layer - orchestrates login and keeps session state consistent
[UPDATE]: When login steps, notices or reconciliation rules change
*/

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::http::NakaroboClient;
use crate::types::VerifyRequest;

use super::challenge::{Challenge, classify_signing_failure, extract_token};
use super::debounce::DebounceTimer;
use super::error::AuthError;
use super::store::SessionStore;
use super::wallet::{WalletConnector, WalletState, normalize_address, same_address};

pub const DEFAULT_DISCONNECT_DEBOUNCE: Duration = Duration::from_millis(500);

const NOTICE_CAPACITY: usize = 32;
const LOGIN_SUCCESS_NOTICE: &str = "Login Successful!";
const ACCOUNT_CHANGED_NOTICE: &str = "Account changed. Please sign in again.";
const DISCONNECTED_NOTICE: &str = "Wallet disconnected. Please sign in again.";

/// Authenticator configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long a disconnect must last before the session is dropped
    pub disconnect_debounce: Duration,
    /// Sent as `referralCode` with every verification
    pub referral_code: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            disconnect_debounce: DEFAULT_DISCONNECT_DEBOUNCE,
            referral_code: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    LoggingIn,
    SignedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// User-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

struct Inner {
    client: NakaroboClient,
    wallet: Arc<dyn WalletConnector>,
    store: SessionStore,
    config: AuthConfig,
    logging_in: AtomicBool,
    authenticated: watch::Sender<bool>,
    notices: broadcast::Sender<Notice>,
    debounce: DebounceTimer,
}

/// Session authenticator
///
/// Drives nonce -> sign -> verify -> commit and, once
/// [`spawn_reconciler`](Self::spawn_reconciler) is running, keeps
/// `is_authenticated` in line with the store and the wallet:
///
/// - store changes (other authenticators, a 401 from the client) re-derive
///   the flag from token presence;
/// - a wallet disconnect clears the session after the debounce window unless
///   the wallet comes back first;
/// - a connected address other than the bound one clears the session without
///   disconnecting the wallet.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionAuthenticator {
    inner: Arc<Inner>,
}

impl SessionAuthenticator {
    pub fn new(client: NakaroboClient, wallet: Arc<dyn WalletConnector>, config: AuthConfig) -> Self {
        let store = client.store().clone();
        let (authenticated, _) = watch::channel(store.has_token());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                client,
                wallet,
                store,
                config,
                logging_in: AtomicBool::new(false),
                authenticated,
                notices,
                debounce: DebounceTimer::new(),
            }),
        }
    }

    pub fn client(&self) -> &NakaroboClient {
        &self.inner.client
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    pub fn wallet(&self) -> &Arc<dyn WalletConnector> {
        &self.inner.wallet
    }

    pub fn is_authenticated(&self) -> bool {
        *self.inner.authenticated.borrow()
    }

    pub fn is_logging_in(&self) -> bool {
        self.inner.logging_in.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        if self.is_logging_in() {
            SessionState::LoggingIn
        } else if self.is_authenticated() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        }
    }

    pub fn subscribe_authenticated(&self) -> watch::Receiver<bool> {
        self.inner.authenticated.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Sign in with the connected wallet
    ///
    /// Every failure is also sent as a notice. A reentrant call returns
    /// `LoginAlreadyInProgress` without touching the network or the wallet.
    pub async fn login(&self) -> Result<(), AuthError> {
        let result = self.run_login().await;
        match &result {
            Ok(()) => self.notify(Notice::new(NoticeLevel::Success, LOGIN_SUCCESS_NOTICE)),
            Err(AuthError::LoginAlreadyInProgress) => {
                warn!("login already in progress, ignoring");
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.notify_error(err);
            }
        }
        result
    }

    async fn run_login(&self) -> Result<(), AuthError> {
        let address = self
            .inner
            .wallet
            .state()
            .address()
            .map(normalize_address)
            .ok_or(AuthError::WalletNotConnected)?;
        let _guard = LoginGuard::acquire(&self.inner.logging_in)
            .ok_or(AuthError::LoginAlreadyInProgress)?;

        debug!(address = %address, "requesting nonce");
        let payload = self
            .inner
            .client
            .request_nonce(&address)
            .await
            .map_err(|e| AuthError::NonceUnavailable(e.to_string()))?;
        let challenge = Challenge::from_response(&payload)?;

        debug!(address = %address, "requesting signature");
        let signature = self
            .inner
            .wallet
            .sign_message(&challenge.message_to_sign())
            .await
            .map_err(|e| classify_signing_failure(&e))?;

        debug!(address = %address, "verifying signature");
        let request = VerifyRequest {
            address: address.clone(),
            signature,
            referral_code: self.inner.config.referral_code.clone(),
        };
        let payload = self
            .inner
            .client
            .verify_signature(&request)
            .await
            .map_err(|e| AuthError::VerificationFailed(e.to_string()))?;
        let token = extract_token(&payload).ok_or_else(|| {
            AuthError::VerificationFailed("response did not contain a token".to_string())
        })?;

        // The wallet may have switched or dropped while we were suspended.
        let still_bound = self
            .inner
            .wallet
            .state()
            .address()
            .is_some_and(|current| same_address(current, &address));
        if !still_bound {
            warn!(address = %address, "wallet changed before login completed, discarding token");
            return Err(AuthError::WalletChanged);
        }

        self.inner
            .store
            .set_session(token, address.clone())
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        self.set_authenticated(true);
        info!(address = %address, "login successful");
        Ok(())
    }

    /// Clear the session and disconnect the wallet. Safe to call when signed out.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.inner.debounce.cancel();
        let cleared = self
            .inner
            .store
            .clear_session()
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        self.set_authenticated(false);
        self.inner.wallet.disconnect().await;

        if cleared {
            info!("logged out");
        } else {
            debug!("logout with no active session");
        }
        Ok(())
    }

    /// Re-read the store from disk and re-derive the authenticated flag
    pub fn refresh(&self) -> Result<bool, AuthError> {
        self.inner
            .store
            .reload()
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        self.sync_from_store();
        Ok(self.is_authenticated())
    }

    /// Start passive reconciliation; runs until `shutdown` is cancelled
    pub fn spawn_reconciler(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let this = self.clone();
        let mut store_rx = self.inner.store.subscribe();
        let mut wallet_rx = self.inner.wallet.subscribe();

        tokio::spawn(async move {
            this.sync_from_store();
            let initial = wallet_rx.borrow_and_update().clone();
            this.on_wallet_state(&initial);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = store_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let _ = store_rx.borrow_and_update();
                        this.sync_from_store();
                        this.check_address_binding(&this.inner.wallet.state());
                    }
                    changed = wallet_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = wallet_rx.borrow_and_update().clone();
                        this.on_wallet_state(&state);
                    }
                }
            }

            this.inner.debounce.cancel();
            debug!("session reconciler stopped");
        })
    }

    fn on_wallet_state(&self, state: &WalletState) {
        if !state.is_connected() {
            let this = self.clone();
            let armed = self
                .inner
                .debounce
                .arm(self.inner.config.disconnect_debounce, move || async move {
                    this.expire_disconnected();
                });
            if armed {
                debug!(
                    delay_ms = self.inner.config.disconnect_debounce.as_millis() as u64,
                    "wallet disconnected, debounce armed"
                );
            }
            return;
        }

        if self.inner.debounce.cancel() {
            debug!("wallet reconnected, debounce cancelled");
        }
        self.check_address_binding(state);
    }

    fn check_address_binding(&self, state: &WalletState) {
        let Some(address) = state.address() else {
            return;
        };
        let Some(session) = self.inner.store.get_session() else {
            return;
        };
        if session.is_bound_to(address) {
            return;
        }

        warn!(
            bound = %session.address,
            connected = %address,
            "wallet address changed, invalidating session"
        );
        match self.inner.store.clear_session() {
            Ok(cleared) => {
                self.set_authenticated(false);
                if cleared {
                    self.notify_error(&AuthError::SessionInvalidated(
                        ACCOUNT_CHANGED_NOTICE.to_string(),
                    ));
                }
            }
            Err(err) => error!(error = %err, "failed to clear session after account change"),
        }
    }

    fn expire_disconnected(&self) {
        if self.inner.wallet.state().is_connected() {
            return;
        }
        match self.inner.store.clear_session() {
            Ok(cleared) => {
                self.set_authenticated(false);
                if cleared {
                    info!("wallet stayed disconnected, session cleared");
                    self.notify_error(&AuthError::SessionInvalidated(
                        DISCONNECTED_NOTICE.to_string(),
                    ));
                }
            }
            Err(err) => error!(error = %err, "failed to clear session after disconnect"),
        }
    }

    fn sync_from_store(&self) {
        self.set_authenticated(self.inner.store.has_token());
    }

    fn set_authenticated(&self, value: bool) {
        self.inner.authenticated.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    fn notify_error(&self, err: &AuthError) {
        if let Some(level) = err.notice_level() {
            self.notify(Notice::new(level, err.to_string()));
        }
    }

    fn notify(&self, notice: Notice) {
        debug!(level = notice.level.as_str(), message = %notice.message, "notice");
        // No subscribers is fine
        let _ = self.inner.notices.send(notice);
    }
}

impl fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("base_url", &self.inner.client.base_url().as_str())
            .field("wallet", &self.inner.wallet.state())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Holds the reentrancy flag for the lifetime of one login
struct LoginGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoginGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
