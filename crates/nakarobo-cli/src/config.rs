/*
[INPUT]:  YAML configuration file and NAKAROBO_PRIVATE_KEY
[OUTPUT]: Parsed client, session and wallet configuration
[POS]:    Configuration layer - CLI setup
[UPDATE]: When adding new configuration options
*/

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use nakarobo_adapter::{AuthConfig, ClientConfig, DEFAULT_API_BASE_URL};

/// Environment variable that overrides `wallet.private_key`
pub const PRIVATE_KEY_ENV: &str = "NAKAROBO_PRIVATE_KEY";

/// Top-level CLI configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Disconnect debounce window in milliseconds
    #[serde(default = "default_disconnect_debounce_ms")]
    pub disconnect_debounce_ms: u64,
    /// Directory holding the session file and pending OAuth state
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,
    /// Inviter code sent with every verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// Wallet-provider project identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Redirect URI registered for the Twitter OAuth flow
    #[serde(default = "default_yappers_redirect_uri")]
    pub yappers_redirect_uri: String,
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// Local wallet configuration
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct WalletConfig {
    /// Hex-encoded EVM private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_timeout_secs(),
            disconnect_debounce_ms: default_disconnect_debounce_ms(),
            session_dir: default_session_dir(),
            referral_code: None,
            project_id: None,
            yappers_redirect_uri: default_yappers_redirect_uri(),
            wallet: WalletConfig::default(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_disconnect_debounce_ms() -> u64 {
    500
}

fn default_session_dir() -> PathBuf {
    PathBuf::from(".nakarobo-config")
}

fn default_yappers_redirect_uri() -> String {
    "http://localhost:3000/callback".to_string()
}

/// Config file used when `--config` is not given
///
/// `<config dir>/nakarobo/config.yaml`, falling back to `./nakarobo.yaml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("nakarobo").join("config.yaml"))
        .unwrap_or_else(|| PathBuf::from("nakarobo.yaml"))
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML content
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse config yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("api_base_url must start with http:// or https://, got '{base}'");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.connect_timeout_secs == 0 {
            bail!("connect_timeout_secs must be greater than zero");
        }
        if self.session_dir.as_os_str().is_empty() {
            bail!("session_dir cannot be empty");
        }
        if self
            .referral_code
            .as_deref()
            .is_some_and(|code| code.trim().is_empty())
        {
            bail!("referral_code cannot be blank; remove it instead");
        }
        Ok(())
    }

    /// Replace the configured key with `override_key` when one is given
    pub fn apply_private_key_override(&mut self, override_key: Option<String>) {
        if let Some(key) = override_key.filter(|key| !key.trim().is_empty()) {
            self.wallet.private_key = Some(key);
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_private_key_override(std::env::var(PRIVATE_KEY_ENV).ok());
    }

    pub fn private_key(&self) -> Option<&str> {
        self.wallet
            .private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.trim().to_string(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            disconnect_debounce: Duration::from_millis(self.disconnect_debounce_ms),
            referral_code: self.referral_code.as_ref().map(|code| code.trim().to_string()),
        }
    }
}
