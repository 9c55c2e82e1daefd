use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// The credential triple issued by the backend on login, signup and refresh.
///
/// The three fields always travel together: they are stored and cleared as a
/// unit so a partially written session can never be observed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SessionCredentials {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub user: Value,
}

impl SessionCredentials {
    /// Role discriminator from the opaque user record (`student` | `admin`).
    pub fn role(&self) -> Option<&str> {
        self.user.get("role").and_then(Value::as_str)
    }

    /// Parse the `{ "data": { "token", "refreshToken", "user" } }` envelope
    /// returned by the auth endpoints.
    pub fn from_envelope(body: &Value) -> Option<Self> {
        let data = body.get("data")?;
        Some(Self {
            access_token: data.get("token")?.as_str()?.to_string(),
            refresh_token: data.get("refreshToken")?.as_str()?.to_string(),
            user: data.get("user").cloned().unwrap_or(Value::Null),
        })
    }
}

/// Storage for the current session credentials.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<SessionCredentials>;
    fn store(&self, credentials: SessionCredentials);
    fn clear(&self);
}

/// In-memory store; the default for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<SessionCredentials>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<SessionCredentials> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    fn store(&self, credentials: SessionCredentials) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(credentials);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

#[derive(Deserialize, Serialize)]
struct PersistedSession {
    #[serde(flatten)]
    credentials: SessionCredentials,
    saved_at: DateTime<Utc>,
}

/// File-backed store persisting the session as a small JSON document.
///
/// A missing or unreadable file is treated as "not logged in"; write failures
/// are logged and otherwise swallowed so storage trouble never breaks a
/// request that already succeeded.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<SessionCredentials> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                debug!(?err, path = %self.path.display(), "failed to read session file");
                return None;
            }
        };

        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(persisted) => Some(persisted.credentials),
            Err(err) => {
                warn!(?err, path = %self.path.display(), "ignoring corrupt session file");
                None
            }
        }
    }

    fn store(&self, credentials: SessionCredentials) {
        let persisted = PersistedSession {
            credentials,
            saved_at: Utc::now(),
        };

        let payload = match serde_json::to_string_pretty(&persisted) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(?err, "failed to serialize session");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    warn!(?err, path = %parent.display(), "failed to create session directory");
                    return;
                }
            }
        }

        if let Err(err) = fs::write(&self.path, payload) {
            warn!(?err, path = %self.path.display(), "failed to persist session");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(?err, path = %self.path.display(), "failed to remove session file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SessionCredentials {
        SessionCredentials {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user: json!({"name": "Asha", "role": "admin"}),
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());

        store.store(sample());
        assert_eq!(store.load(), Some(sample()));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn role_reads_discriminator() {
        assert_eq!(sample().role(), Some("admin"));

        let anonymous = SessionCredentials {
            user: Value::Null,
            ..sample()
        };
        assert_eq!(anonymous.role(), None);
    }

    #[test]
    fn envelope_parsing_requires_both_tokens() {
        let body = json!({
            "data": {
                "token": "a",
                "refreshToken": "r",
                "user": {"role": "student"}
            }
        });
        let credentials = SessionCredentials::from_envelope(&body).unwrap();
        assert_eq!(credentials.access_token, "a");
        assert_eq!(credentials.refresh_token, "r");
        assert_eq!(credentials.role(), Some("student"));

        let missing_refresh = json!({"data": {"token": "a", "user": {}}});
        assert!(SessionCredentials::from_envelope(&missing_refresh).is_none());
        assert!(SessionCredentials::from_envelope(&json!({})).is_none());
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().is_none());
        store.store(sample());
        assert_eq!(store.load(), Some(sample()));

        store.clear();
        assert!(store.load().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_ignores_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().is_none());
    }
}
