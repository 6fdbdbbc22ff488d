//! Credential token storage.
//!
//! A single slot holding the raw token string. The file-backed store writes
//! `${CDASH_HOME}/token` with restricted permissions (0600). Tokens are never
//! logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::config::paths;

/// The persisted credential slot. Absence means logged out.
pub trait TokenStore {
    /// Returns the stored token, or `None` if the slot is empty.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    fn save(&self, token: &str) -> Result<()>;

    /// Empties the slot. Returns whether a token was present.
    fn clear(&self) -> Result<bool>;
}

/// File-backed token slot.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(paths::token_path())
    }
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token from {}", self.path.display()))?;
        let trimmed = contents.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
        file.write_all(token.as_bytes())
            .with_context(|| format!("Failed to write to {}", self.path.display()))?;

        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove token at {}", self.path.display())),
        }
    }
}

/// In-memory token slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    /// Returns a copy of the slot contents without going through the trait.
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> Result<T> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_poisoned| anyhow::anyhow!("token slot lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        self.with_slot(|slot| slot.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        self.with_slot(|slot| *slot = Some(token.to_string()))
    }

    fn clear(&self) -> Result<bool> {
        self.with_slot(|slot| slot.take().is_some())
    }
}
