/*
[INPUT]:  Failures from the login pipeline and session reconciliation
[OUTPUT]: Client-visible authentication errors and their notice level
[POS]:    Auth layer - error taxonomy
[UPDATE]: When adding login steps or changing user-facing messages
*/

use thiserror::Error;

use super::authenticator::NoticeLevel;

/// Authentication errors surfaced to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please connect wallet first")]
    WalletNotConnected,

    #[error("Login already in progress")]
    LoginAlreadyInProgress,

    #[error("Failed to get nonce: {0}")]
    NonceUnavailable(String),

    #[error("User rejected signature request")]
    UserRejected,

    #[error("Failed to sign message: {0}")]
    SigningFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Wallet changed during login. Please sign in again.")]
    WalletChanged,

    #[error("{0}")]
    SessionInvalidated(String),

    #[error("Failed to save session: {0}")]
    SessionStorage(String),

    #[error("Authorization expired. Please sign in again.")]
    AuthorizationExpired,
}

impl AuthError {
    /// Conditions recovered locally without anything going wrong server-side
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AuthError::WalletNotConnected | AuthError::LoginAlreadyInProgress | AuthError::UserRejected
        )
    }

    /// Level of the notice shown for this error, `None` when nothing is shown
    pub fn notice_level(&self) -> Option<NoticeLevel> {
        match self {
            AuthError::LoginAlreadyInProgress => None,
            AuthError::WalletNotConnected => Some(NoticeLevel::Warning),
            AuthError::UserRejected | AuthError::SessionInvalidated(_) => Some(NoticeLevel::Info),
            _ => Some(NoticeLevel::Error),
        }
    }
}
