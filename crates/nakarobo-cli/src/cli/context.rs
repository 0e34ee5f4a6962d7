/*
[INPUT]:  Loaded AppConfig
[OUTPUT]: Session store, API client, wallet and authenticator wiring
[POS]:    CLI composition root shared by every command
[UPDATE]: When command dependencies or wiring change
*/

use std::sync::Arc;

use anyhow::{Context, Result};

use nakarobo_adapter::{
    LocalWallet, NakaroboClient, SessionAuthenticator, SessionStore, StoredSession,
};

use crate::config::{AppConfig, PRIVATE_KEY_ENV};
use crate::state::Storage;

/// Everything a command needs, built once from the configuration
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: SessionStore,
    pub client: NakaroboClient,
    pub storage: Storage,
}

impl AppContext {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store = SessionStore::open(&config.session_dir).with_context(|| {
            format!("open session store in {}", config.session_dir.display())
        })?;
        let client = NakaroboClient::with_config(config.client_config(), store.clone())
            .context("create api client")?;
        let storage = Storage::new(&config.session_dir)
            .await
            .context("open cli state")?;

        Ok(Self {
            config,
            store,
            client,
            storage,
        })
    }

    /// Local wallet from the configured private key (not yet connected)
    pub fn wallet(&self) -> Result<Arc<LocalWallet>> {
        let key = self.config.private_key().with_context(|| {
            format!("no wallet configured: set wallet.private_key or {PRIVATE_KEY_ENV}")
        })?;
        let wallet = LocalWallet::new(key).context("load wallet")?;
        Ok(Arc::new(wallet))
    }

    pub fn authenticator(&self, wallet: Arc<LocalWallet>) -> SessionAuthenticator {
        SessionAuthenticator::new(self.client.clone(), wallet, self.config.auth_config())
    }

    /// Current session, or an error telling the user to log in
    pub fn require_session(&self) -> Result<StoredSession> {
        self.store
            .get_session()
            .context("Not signed in. Run `nakarobo-cli login` first.")
    }
}
