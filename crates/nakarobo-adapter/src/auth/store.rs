/*
[INPUT]:  Session tokens and the wallet address they were issued for
[OUTPUT]: Shared, observable session state with optional file persistence
[POS]:    Auth layer - session token lifecycle and cross-view notification
[UPDATE]: When changing storage location, file format or notification strategy
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::http::Result;

/// File name of the persisted session inside the session directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// A bearer token together with the address it is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub address: String,
    #[serde(default = "Utc::now")]
    pub issued_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            address: address.into(),
            issued_at: Utc::now(),
        }
    }

    /// True when the session is bound to `address` (case-insensitive)
    pub fn is_bound_to(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address.trim())
    }
}

#[derive(Debug)]
struct StoreInner {
    state: watch::Sender<Option<StoredSession>>,
    path: Option<PathBuf>,
}

/// Shared session store
///
/// Token and bound address always change together: the value is a single
/// `Option<StoredSession>` published through a `watch` channel, so every
/// subscriber sees either both or neither.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    /// Create a store that lives only in memory
    pub fn in_memory() -> Self {
        Self::from_parts(None, None)
    }

    /// Open a file-backed store in `dir`, loading any session already on disk
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(SESSION_FILE_NAME);
        let initial = read_session_file(&path)?;
        Ok(Self::from_parts(Some(path), initial))
    }

    fn from_parts(path: Option<PathBuf>, initial: Option<StoredSession>) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(StoreInner { state, path }),
        }
    }

    /// Backing file, if this store persists to disk
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Current session, if any
    pub fn get_session(&self) -> Option<StoredSession> {
        self.inner.state.borrow().clone()
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .map(|session| session.token.clone())
    }

    /// Address the current token is bound to, if any
    pub fn bound_address(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .map(|session| session.address.clone())
    }

    pub fn has_token(&self) -> bool {
        self.inner.state.borrow().is_some()
    }

    /// Store a new session, replacing any previous one
    pub fn set_session(&self, token: impl Into<String>, address: impl Into<String>) -> Result<()> {
        let session = StoredSession::new(token, address);
        if let Some(path) = &self.inner.path {
            write_session_file(path, &session)?;
        }
        debug!(address = %session.address, "session stored");
        self.inner.state.send_replace(Some(session));
        Ok(())
    }

    /// Remove the session. Returns whether one was present.
    pub fn clear_session(&self) -> Result<bool> {
        if let Some(path) = &self.inner.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }

        let cleared = self.inner.state.send_if_modified(|state| state.take().is_some());
        if cleared {
            debug!("session cleared");
        }
        Ok(cleared)
    }

    /// Re-read the backing file and publish it if it differs from memory.
    ///
    /// Picks up writes made by other processes sharing the same directory.
    /// In-memory stores are left untouched.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        let on_disk = read_session_file(path)?;
        self.inner.state.send_if_modified(|state| {
            if *state == on_disk {
                false
            } else {
                *state = on_disk;
                true
            }
        });
        Ok(())
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<Option<StoredSession>> {
        self.inner.state.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn read_session_file(path: &Path) -> Result<Option<StoredSession>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    match serde_json::from_str::<StoredSession>(&content) {
        Ok(session) if !session.token.is_empty() && !session.address.is_empty() => {
            Ok(Some(session))
        }
        Ok(_) => Ok(None),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable session file");
            Ok(None)
        }
    }
}

fn write_session_file(path: &Path, session: &StoredSession) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_vec_pretty(session)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(&tmp_path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&tmp_path, perms)?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("nakarobo-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::in_memory();
        assert!(!store.has_token());
        assert!(store.token().is_none());
        assert!(store.bound_address().is_none());
    }

    #[test]
    fn test_set_and_clear_session() {
        let store = SessionStore::in_memory();
        store.set_session("jwt1", "0xabc").unwrap();

        assert_eq!(store.token(), Some("jwt1".to_string()));
        assert_eq!(store.bound_address(), Some("0xabc".to_string()));

        assert!(store.clear_session().unwrap());
        assert!(store.get_session().is_none());
        assert!(!store.clear_session().unwrap());
    }

    #[test]
    fn test_clearing_empty_store_does_not_notify() {
        let store = SessionStore::in_memory();
        let rx = store.subscribe();
        store.clear_session().unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_subscribers_see_token_and_address_together() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();
        store.set_session("jwt1", "0xabc").unwrap();

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone().unwrap();
        assert_eq!(seen.token, "jwt1");
        assert_eq!(seen.address, "0xabc");
    }

    #[test]
    fn test_bound_address_compare_is_case_insensitive() {
        let session = StoredSession::new("t", "0xabcdef");
        assert!(session.is_bound_to("0xABCDEF"));
        assert!(!session.is_bound_to("0xabcdee"));
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = temp_dir();
        let store = SessionStore::open(&dir).unwrap();
        store.set_session("jwt1", "0xabc").unwrap();

        let reopened = SessionStore::open(&dir).unwrap();
        assert_eq!(reopened.token(), Some("jwt1".to_string()));
        assert_eq!(reopened.bound_address(), Some("0xabc".to_string()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(dir.join(SESSION_FILE_NAME)).unwrap();
            assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        }

        reopened.clear_session().unwrap();
        assert!(!dir.join(SESSION_FILE_NAME).exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let dir = temp_dir();
        let first = SessionStore::open(&dir).unwrap();
        let second = SessionStore::open(&dir).unwrap();

        first.set_session("jwt1", "0xabc").unwrap();
        assert!(second.get_session().is_none());

        second.reload().unwrap();
        assert_eq!(second.token(), Some("jwt1".to_string()));

        first.clear_session().unwrap();
        second.reload().unwrap();
        assert!(second.get_session().is_none());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_session_file_is_ignored() {
        let dir = temp_dir();
        fs::write(dir.join(SESSION_FILE_NAME), r#"{"token":"only-token"}"#).unwrap();

        let store = SessionStore::open(&dir).unwrap();
        assert!(store.get_session().is_none());

        fs::remove_dir_all(dir).unwrap();
    }
}
