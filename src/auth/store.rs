//! Bearer-token storage.
//!
//! Backends:
//! - [`FileSessionStore`]: one plaintext file holding the token
//! - [`MemorySessionStore`]: process-local, for tests and one-shot use
//!
//! Reads never fail: a missing, unreadable, or blank store reads as "no
//! token". Writes report I/O errors.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// File name used for the persisted token inside the data directory.
pub const TOKEN_FILE_NAME: &str = "session_token";

/// Storage for the bearer token.
pub trait SessionStore: Send + Sync {
    /// Store `token`, replacing any previous value.
    fn set_token(&self, token: &str) -> Result<()>;

    /// The stored token, or `None` when nothing usable is stored.
    fn get_token(&self) -> Option<String>;

    /// Forget the stored token. Removing an absent token is not an error.
    fn remove_token(&self) -> Result<()>;

    /// True iff a token is present.
    fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

// ── File-backed store ───────────────────────────────────────────

/// Token persisted to a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `<data_dir>/session_token`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn set_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory {}", parent.display())
            })?;
        }
        write_owner_only(&self.path, token)
            .with_context(|| format!("Failed to write session token to {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Session token stored");
        Ok(())
    }

    fn get_token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn remove_token(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session token at {}", self.path.display())
            }),
        }
    }
}

/// Write `token`, creating the file as 0600 so it is never readable by others.
#[cfg(unix)]
fn write_owner_only(path: &Path, token: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(token.as_bytes())
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, token: &str) -> std::io::Result<()> {
    std::fs::write(path, token)
}

// Pre-existing files keep their old mode on open; tighten them too.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

// ── In-memory store ─────────────────────────────────────────────

/// Token held in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn set_token(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn get_token(&self) -> Option<String> {
        self.token.lock().clone().filter(|t| !t.is_empty())
    }

    fn remove_token(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, FileSessionStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_dir(tmp.path());
        (tmp, store)
    }

    #[test]
    fn file_store_set_get_remove() {
        let (_tmp, store) = test_store();

        assert!(!store.is_authenticated());
        assert!(store.get_token().is_none());

        store.set_token("abc").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.get_token().as_deref(), Some("abc"));

        store.remove_token().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.get_token().is_none());
    }

    #[test]
    fn file_store_overwrites_previous_token() {
        let (_tmp, store) = test_store();

        store.set_token("first").unwrap();
        store.set_token("second").unwrap();
        assert_eq!(store.get_token().as_deref(), Some("second"));
    }

    #[test]
    fn file_store_creates_missing_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::new(tmp.path().join("nested/deeper/token"));

        store.set_token("tok").unwrap();
        assert_eq!(store.get_token().as_deref(), Some("tok"));
    }

    #[test]
    fn file_store_blank_file_reads_as_absent() {
        let (_tmp, store) = test_store();
        std::fs::write(store.path(), "  \n").unwrap();

        assert!(store.get_token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_store_trims_trailing_newline() {
        let (_tmp, store) = test_store();
        std::fs::write(store.path(), "tok1\n").unwrap();

        assert_eq!(store.get_token().as_deref(), Some("tok1"));
    }

    #[test]
    fn file_store_remove_absent_is_ok() {
        let (_tmp, store) = test_store();
        assert!(store.remove_token().is_ok());
    }

    #[test]
    fn file_store_unreadable_location_reads_as_absent() {
        let store = FileSessionStore::new("/nonexistent-churnctl-dir/session_token");
        assert!(store.get_token().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_tmp, store) = test_store();
        store.set_token("secret").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn file_store_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;
        let (_tmp, store) = test_store();
        std::fs::write(store.path(), "old").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.set_token("new").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get_token().as_deref(), Some("new"));
    }

    #[cfg(unix)]
    #[test]
    fn write_owner_only_creates_file_as_0600() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fresh");

        write_owner_only(&path, "tok").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "tok");
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.set_token("abc").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.get_token().as_deref(), Some("abc"));

        store.remove_token().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.get_token().is_none());
    }

    #[test]
    fn memory_store_with_token_is_authenticated() {
        let store = MemorySessionStore::with_token("seed");
        assert_eq!(store.get_token().as_deref(), Some("seed"));
    }
}
