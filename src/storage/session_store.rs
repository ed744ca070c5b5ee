use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::StorageError;
use crate::model::Session;

/// File name of the cached session inside the data directory.
const SESSION_FILE: &str = "session.json";

/// Caches the provider session on disk so it survives restarts.
///
/// Holds at most one session, stored as a single JSON document.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store that keeps its file in `dir`.
    ///
    /// The directory is created lazily on the first [`save`](Self::save).
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Returns the path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached session, or `None` if nothing is cached.
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Writes `session`, replacing any previously cached one.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Removes the cached session. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn make_session() -> Session {
        Session {
            uid: "uid-42".into(),
            email: "asha@iitd.ac.in".into(),
            email_verified: true,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn load_without_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        let session = make_session();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path().join("nested").join("campus"));
        store.save(&make_session()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        store.save(&make_session()).unwrap();
        let mut other = make_session();
        other.uid = "uid-43".into();
        store.save(&other).unwrap();
        assert_eq!(store.load().unwrap().unwrap().uid, "uid-43");
    }

    #[test]
    fn clear_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        store.save(&make_session()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_on_empty_store_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn corrupt_file_returns_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }
}
