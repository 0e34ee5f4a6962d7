/*
[INPUT]:  Messages to sign and wallet connection events
[OUTPUT]: Signatures, observable connection state, disconnect requests
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet types or changing the connection model
*/

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Connection state reported by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletState {
    #[default]
    Disconnected,
    Connected { address: String },
}

impl WalletState {
    /// Connected state with the address normalized to lowercase
    pub fn connected(address: &str) -> Self {
        WalletState::Connected {
            address: normalize_address(address),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletState::Connected { .. })
    }

    /// Connected address, if any and non-empty
    pub fn address(&self) -> Option<&str> {
        match self {
            WalletState::Connected { address } if !address.is_empty() => Some(address),
            _ => None,
        }
    }
}

/// Lowercase, trimmed form used for every address comparison and storage
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// Case-insensitive address comparison
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Failure reported by a wallet, with the provider's reason text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct WalletError {
    reason: String,
}

impl WalletError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Trait for wallet connectors
///
/// Implement this for your wallet provider. Connection state is observed
/// through a `watch` channel so the authenticator can react to disconnects
/// and account switches. Signing is async to support hardware wallets and
/// external signers.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Current connection state
    fn state(&self) -> WalletState;

    /// Subscribe to connection state changes
    fn subscribe(&self) -> watch::Receiver<WalletState>;

    /// Sign a human-readable message with the connected account
    async fn sign_message(&self, message: &str) -> Result<String, WalletError>;

    /// Ask the provider to disconnect. Disconnecting twice is harmless.
    async fn disconnect(&self);
}

/// Observable connection state shared by wallet implementations
#[derive(Debug, Clone)]
pub struct ConnectionCell {
    state: Arc<watch::Sender<WalletState>>,
}

impl ConnectionCell {
    pub fn new(initial: WalletState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn get(&self) -> WalletState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.state.subscribe()
    }

    /// Publish a new state; identical states are not re-announced
    pub fn set(&self, next: WalletState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Default for ConnectionCell {
    fn default() -> Self {
        Self::new(WalletState::Disconnected)
    }
}

#[derive(Debug)]
struct MockWalletInner {
    connection: ConnectionCell,
    outcome: Mutex<Result<String, WalletError>>,
    sign_delay: Mutex<Option<Duration>>,
    last_message: Mutex<Option<String>>,
    sign_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
}

/// Scriptable wallet for testing
#[derive(Debug, Clone)]
pub struct MockWallet {
    inner: Arc<MockWalletInner>,
}

impl MockWallet {
    /// Create a connected mock wallet that always returns `signature`
    pub fn new(address: &str, signature: &str) -> Self {
        Self {
            inner: Arc::new(MockWalletInner {
                connection: ConnectionCell::new(WalletState::connected(address)),
                outcome: Mutex::new(Ok(signature.to_string())),
                sign_delay: Mutex::new(None),
                last_message: Mutex::new(None),
                sign_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Make every subsequent signing request fail with `reason`
    pub fn fail_signing(&self, reason: &str) {
        *lock(&self.inner.outcome) = Err(WalletError::new(reason));
    }

    /// Make every subsequent signing request succeed with `signature`
    pub fn sign_with(&self, signature: &str) {
        *lock(&self.inner.outcome) = Ok(signature.to_string());
    }

    /// Hold each signing request for `delay` before answering
    pub fn set_sign_delay(&self, delay: Duration) {
        *lock(&self.inner.sign_delay) = Some(delay);
    }

    /// Connect (or switch) to `address`
    pub fn connect(&self, address: &str) {
        self.inner.connection.set(WalletState::connected(address));
    }

    /// Simulate the provider dropping the connection
    pub fn drop_connection(&self) {
        self.inner.connection.set(WalletState::Disconnected);
    }

    pub fn sign_calls(&self) -> usize {
        self.inner.sign_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<String> {
        lock(&self.inner.last_message).clone()
    }
}

#[async_trait]
impl WalletConnector for MockWallet {
    fn state(&self) -> WalletState {
        self.inner.connection.get()
    }

    fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.inner.connection.subscribe()
    }

    async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        self.inner.sign_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.inner.last_message) = Some(message.to_string());

        let delay = *lock(&self.inner.sign_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.inner.outcome).clone()
    }

    async fn disconnect(&self) {
        self.inner.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.connection.set(WalletState::Disconnected);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
