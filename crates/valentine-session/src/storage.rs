//! Where the credential lives between runs.
//!
//! The storage model is a tiny key-value store with exactly one key we
//! care about, [`CREDENTIAL_KEY`]. "Key present" means logged in, "key
//! absent" (or no file at all) means logged out.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::SessionError;

/// The fixed key the credential is stored under.
pub const CREDENTIAL_KEY: &str = "access_token";

/// Persists the single credential string.
///
/// `Send + Sync` because the [`SessionStore`](crate::SessionStore) that
/// owns it is shared behind an `Arc`.
pub trait CredentialStorage: Send + Sync + 'static {
    /// Returns the stored token, or `None` if logged out.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Stores `token`, overwriting any previous one.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Removes the token. Removing when nothing is stored is not an error.
    fn remove(&self) -> Result<(), SessionError>;
}

/// Lets callers pick a backend at runtime (e.g. from a CLI flag).
impl CredentialStorage for Box<dyn CredentialStorage> {
    fn load(&self) -> Result<Option<String>, SessionError> {
        (**self).load()
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        (**self).save(token)
    }

    fn remove(&self) -> Result<(), SessionError> {
        (**self).remove()
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that already holds `token`, as if a previous run
    /// had logged in.
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// A JSON object file, e.g. `{"access_token": "..."}`.
///
/// Other keys in the file are preserved. On Unix the file is written
/// with `0600` permissions since it holds a bearer secret.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage backed by the file at `path`. The file doesn't need to
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(SessionError::Storage {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Like `read_map`, but an unparseable file counts as empty so that
    /// the next write replaces it.
    fn read_map_for_update(&self) -> Result<Map<String, Value>, SessionError> {
        match self.read_map() {
            Err(SessionError::Corrupt { path, source }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "overwriting unreadable credential file"
                );
                Ok(Map::new())
            }
            other => other,
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), SessionError> {
        let storage_err = |source| SessionError::Storage {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(storage_err)?;
            }
        }

        let contents = serde_json::to_string_pretty(map).map_err(|source| {
            SessionError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(storage_err)?;
        // `mode` only applies on create; tighten a file that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(storage_err)?;
        }
        file.write_all(contents.as_bytes()).map_err(storage_err)
    }
}

impl CredentialStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let map = self.read_map()?;
        Ok(map
            .get(CREDENTIAL_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut map = self.read_map_for_update()?;
        map.insert(CREDENTIAL_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn remove(&self) -> Result<(), SessionError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(SessionError::Corrupt { .. }) => {
                tracing::warn!(path = %self.path.display(), "resetting unreadable credential file");
                return self.write_map(&Map::new());
            }
            Err(e) => return Err(e),
        };
        if map.remove(CREDENTIAL_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/credentials.json"));
        (dir, storage)
    }

    #[test]
    fn test_memory_storage_starts_empty() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_memory_storage_save_then_remove() {
        let storage = MemoryStorage::with_token("old");
        storage.save("new").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("new"));

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_logged_out() {
        let (_dir, storage) = temp_storage();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_storage_save_creates_parent_dirs() {
        let (_dir, storage) = temp_storage();

        storage.save("abc").unwrap();

        assert!(storage.path().exists());
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_storage_writes_fixed_key() {
        let (_dir, storage) = temp_storage();
        storage.save("abc").unwrap();

        let raw = fs::read_to_string(storage.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[CREDENTIAL_KEY], "abc");
    }

    #[test]
    fn test_file_storage_preserves_other_keys() {
        let (_dir, storage) = temp_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), r#"{"theme": "pink"}"#).unwrap();

        storage.save("abc").unwrap();
        storage.remove().unwrap();

        let raw = fs::read_to_string(storage.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["theme"], "pink");
        assert!(value.get(CREDENTIAL_KEY).is_none());
    }

    #[test]
    fn test_file_storage_remove_without_file_is_ok() {
        let (_dir, storage) = temp_storage();
        storage.remove().unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_corrupt_file_is_reported() {
        let (_dir, storage) = temp_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.load(),
            Err(SessionError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_file_storage_save_replaces_corrupt_file() {
        let (_dir, storage) = temp_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "{\"access_tok").unwrap();

        storage.save("abc").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_storage_remove_resets_corrupt_file() {
        let (_dir, storage) = temp_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "not json").unwrap();

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, storage) = temp_storage();
        storage.save("abc").unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, storage) = temp_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "{}").unwrap();
        fs::set_permissions(storage.path(), fs::Permissions::from_mode(0o644)).unwrap();

        storage.save("abc").unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
