use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TaskboardError;

/// Key the token is stored under inside the session file.
pub const TOKEN_KEY: &str = "token";

#[derive(Serialize, Deserialize, Default)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Durable, profile-scoped storage for a single bearer token.
///
/// A stale token is indistinguishable from a valid one until the backend
/// rejects it; no expiry is tracked here.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current token, or `None` when missing, empty, or unreadable.
    pub fn get(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let file: SessionFile = match serde_json::from_str(&raw) {
            Ok(f) => f,
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "ignoring unreadable session file");
                return None;
            }
        };
        file.token.filter(|t| !t.trim().is_empty())
    }

    pub fn set(&self, token: &str) -> Result<(), TaskboardError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TaskboardError::session(format!("mkdir {}: {e}", parent.display()))
                })?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                        tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                    }
                }
            }
        }

        let body = serde_json::to_string(&SessionFile {
            token: Some(token.to_string()),
        })?;
        fs::write(&self.path, body)
            .map_err(|e| TaskboardError::session(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                TaskboardError::session(format!("chmod {}: {e}", self.path.display()))
            })?;
        }

        tracing::debug!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), TaskboardError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TaskboardError::session(format!(
                "failed to delete {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_get_clear_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("nested").join("session.json"));
        assert_eq!(store.get(), None);

        store.set("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));

        let raw = fs::read_to_string(store.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v[TOKEN_KEY], "abc");

        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn clear_without_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        assert!(store.clear().is_ok());
    }

    #[test]
    fn empty_or_garbage_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path);

        fs::write(&path, r#"{"token": "  "}"#).unwrap();
        assert_eq!(store.get(), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(store.get(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        store.set("abc").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
