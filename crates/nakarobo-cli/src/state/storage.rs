/*
[INPUT]:  Pending Twitter OAuth state from `yappers connect`
[OUTPUT]: Persisted PKCE verifier picked up by `yappers callback`
[POS]:    State layer - CLI-side persistence next to the session file
[UPDATE]: When the OAuth link flow or storage layout changes
*/

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const PENDING_LINK_FILE: &str = "twitter_link.json";

/// OAuth link started by `yappers connect` and not yet completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLink {
    pub code_verifier: String,
    /// Must match the redirect URI sent with the connect request
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
}

impl PendingLink {
    pub fn new(code_verifier: String, redirect_uri: String) -> Self {
        Self {
            code_verifier,
            redirect_uri,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.code_verifier.is_empty() {
            return Err(anyhow!("Code verifier cannot be empty"));
        }
        if self.redirect_uri.is_empty() {
            return Err(anyhow!("Redirect URI cannot be empty"));
        }
        Ok(())
    }
}

/// Storage manager for CLI state kept beside the session file
#[derive(Debug)]
pub struct Storage {
    pending_link_path: PathBuf,
}

impl Storage {
    pub async fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).await?;
        Ok(Self {
            pending_link_path: dir.join(PENDING_LINK_FILE),
        })
    }

    pub async fn save_pending_link(&self, link: &PendingLink) -> Result<()> {
        link.validate()?;
        let content = serde_json::to_string_pretty(link)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.pending_link_path.with_extension("tmp");
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.pending_link_path).await?;
        Ok(())
    }

    pub async fn load_pending_link(&self) -> Result<Option<PendingLink>> {
        let content = match fs::read_to_string(&self.pending_link_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let link: PendingLink = serde_json::from_str(&content)?;
        Ok(Some(link).filter(|link| link.validate().is_ok()))
    }

    /// Remove the pending link. Returns whether one existed.
    pub async fn clear_pending_link(&self) -> Result<bool> {
        match fs::remove_file(&self.pending_link_path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("nakarobo-cli-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_pending_link_lifecycle() {
        let dir = temp_dir();
        let storage = Storage::new(&dir).await.unwrap();
        assert!(storage.load_pending_link().await.unwrap().is_none());

        let link = PendingLink::new("v123".to_string(), "http://localhost:3000/callback".to_string());
        storage.save_pending_link(&link).await.unwrap();
        assert_eq!(storage.load_pending_link().await.unwrap(), Some(link));

        assert!(storage.clear_pending_link().await.unwrap());
        assert!(!storage.clear_pending_link().await.unwrap());
        assert!(storage.load_pending_link().await.unwrap().is_none());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_empty_verifier_is_rejected() {
        let dir = temp_dir();
        let storage = Storage::new(&dir).await.unwrap();
        let link = PendingLink::new(String::new(), "http://localhost:3000/callback".to_string());
        assert!(storage.save_pending_link(&link).await.is_err());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
