//! Durable session storage abstraction.
//!
//! The session snapshot is serialized to a storage backend on every mutation
//! and rehydrated at store construction, so an application restart does not
//! force re-login. Backends exist for files (desktop/CLI shells) and plain
//! memory (tests, ephemeral sessions); WASM hosts can implement the trait
//! over browser localStorage.

use crate::error::{BackofficeLinkError, Result};
use crate::session::SessionSnapshot;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default file name for the persisted session.
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Trait for durable session storage backends.
///
/// Implementations hold at most one session snapshot. `load` returns
/// `Ok(None)` when nothing has been persisted yet; `clear` succeeds even
/// when nothing is stored.
///
/// # Security Note
///
/// The snapshot contains bearer credentials. File-based implementations must
/// use restrictive permissions (0600 on Unix) and tokens must never be
/// logged.
pub trait SessionStorage: Send + Sync {
    /// Load the persisted snapshot, if any.
    fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Persist the snapshot, replacing any previous one.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Remove the persisted snapshot.
    fn clear(&self) -> Result<()>;
}

/// In-memory session storage for testing and temporary sessions.
///
/// Does NOT persist across restarts.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    snapshot: Mutex<Option<SessionSnapshot>>,
}

impl MemorySessionStorage {
    /// Create a new empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<SessionSnapshot>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        *self.lock()? = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemorySessionStorage {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionSnapshot>>> {
        self.snapshot
            .lock()
            .map_err(|_| BackofficeLinkError::StorageError("session storage poisoned".to_string()))
    }
}

/// File-based session storage.
///
/// Persists the snapshot as JSON with secure file permissions.
///
/// # File Location
///
/// - Windows: `~/.backoffice/session.json`
/// - Linux/macOS: `~/.config/backoffice/session.json`
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    file_path: PathBuf,
}

impl FileSessionStorage {
    /// Default session file path.
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".backoffice").join(DEFAULT_SESSION_FILE)
            } else {
                PathBuf::from(".backoffice").join(DEFAULT_SESSION_FILE)
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("backoffice").join(DEFAULT_SESSION_FILE)
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("backoffice")
                    .join(DEFAULT_SESSION_FILE)
            } else {
                PathBuf::from(".backoffice").join(DEFAULT_SESSION_FILE)
            }
        }
    }

    /// Create a file-based storage at the default location
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a file-based storage at a custom location
    pub fn with_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    #[cfg(unix)]
    fn set_secure_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_secure_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }
}

impl Default for FileSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<SessionSnapshot>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.file_path)?;
        match serde_json::from_str::<SessionSnapshot>(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // A corrupt session file should not brick the application;
                // treat it as no session and let the user log in again.
                log::warn!(
                    "[STORAGE] Discarding unreadable session file {}: {}",
                    self.file_path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.file_path, json)?;
        Self::set_secure_permissions(&self.file_path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            std::fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }
}
