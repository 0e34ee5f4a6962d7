/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: EIP-191 personal-sign signatures and an observable connection
[POS]:    Auth layer - local EVM wallet implementation
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::str::FromStr;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::auth::wallet::{ConnectionCell, WalletConnector, WalletError, WalletState};
use crate::http::{NakaroboError, Result};

/// Wallet backed by a private key held in process memory
///
/// Starts disconnected; `connect` announces the derived address the same
/// way a browser wallet announces an account.
pub struct LocalWallet {
    signer: PrivateKeySigner,
    address: String,
    connection: ConnectionCell,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.trim();
        let private_key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| NakaroboError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = signer.address().to_checksum(None).to_ascii_lowercase();

        Ok(Self {
            signer,
            address,
            connection: ConnectionCell::default(),
        })
    }

    /// Lowercase address derived from the key
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Announce the account as connected
    pub fn connect(&self) {
        info!(address = %self.address, "local wallet connected");
        self.connection.set(WalletState::connected(&self.address));
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .field("state", &self.connection.get())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletConnector for LocalWallet {
    fn state(&self) -> WalletState {
        self.connection.get()
    }

    fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.connection.subscribe()
    }

    async fn sign_message(&self, message: &str) -> std::result::Result<String, WalletError> {
        if !self.connection.get().is_connected() {
            return Err(WalletError::new("Wallet is not connected"));
        }

        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| WalletError::new(format!("Failed to sign message: {e}")))?;

        // r || s || v
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    async fn disconnect(&self) {
        self.connection.set(WalletState::Disconnected);
    }
}
