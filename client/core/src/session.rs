//! Session token storage
//!
//! The token is opaque. Nothing here checks expiry: a stale token surfaces as
//! an authentication error on the next API call.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Holds the optional bearer token for the current session
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: Option<String>) -> Result<()>;

    fn clear(&self) -> Result<()> {
        self.set_token(None)
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: Option<String>) -> Result<()> {
        *self.token.write() = token;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Store persisted to a JSON file so the session survives restarts
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    token: RwLock<Option<String>>,
}

impl FileSessionStore {
    /// Opens the store, reading any token already on disk.
    /// A missing or unreadable file means no session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = Self::read(&path);
        Self {
            path,
            token: RwLock::new(token),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) => Some(file.token),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: Option<String>) -> Result<()> {
        match &token {
            Some(t) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let content = serde_json::to_string(&SessionFile { token: t.clone() })?;
                fs::write(&self.path, content)?;
            }
            None => match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        *self.token.write() = token;
        Ok(())
    }
}
