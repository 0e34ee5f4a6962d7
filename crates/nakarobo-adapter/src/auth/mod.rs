/*
[INPUT]:  Wallet connector, API client and session store
[OUTPUT]: Session lifecycle: login, logout, reconciliation, notices
[POS]:    Auth layer - wallet-signature authentication for the NakaRobo API
[UPDATE]: When auth flow or session rules change
*/

pub mod authenticator;
pub mod challenge;
pub mod debounce;
pub mod error;
pub mod local_wallet;
pub mod store;
pub mod wallet;

pub use authenticator::{
    AuthConfig, DEFAULT_DISCONNECT_DEBOUNCE, Notice, NoticeLevel, SessionAuthenticator,
    SessionState,
};
pub use challenge::{Challenge, classify_signing_failure, extract_token, fallback_message};
pub use debounce::DebounceTimer;
pub use error::AuthError;
pub use local_wallet::LocalWallet;
pub use store::{SESSION_FILE_NAME, SessionStore, StoredSession};
pub use wallet::{MockWallet, WalletConnector, WalletError, WalletState};
