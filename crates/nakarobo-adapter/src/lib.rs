/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public NakaRobo adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthConfig,
    AuthError,
    LocalWallet,
    MockWallet,
    Notice,
    NoticeLevel,
    SessionAuthenticator,
    SessionState,
    SessionStore,
    StoredSession,
    WalletConnector,
    WalletError,
    WalletState,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    DEFAULT_API_BASE_URL,
    NakaroboClient,
    NakaroboError,
    Result,
};

// Re-export all types
pub use types::*;
