//! Session Cookie Store
//!
//! Persists the raw `Set-Cookie` strings the verification service hands out
//! at login so the HTTP-only session survives across process runs. The
//! client never parses or mints tokens; it only replays what the service
//! set.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_ledgerlens_dir, session_path};

/// On-disk shape of the stored session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    /// Raw cookie strings as received from the service
    cookies: Vec<String>,
}

/// File-backed store for the session cookies of one backend origin
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store at the default session path
    pub fn new() -> AppResult<Self> {
        ensure_ledgerlens_dir()?;
        Ok(Self::at_path(session_path()?))
    }

    /// Create a store backed by an explicit file path
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the stored cookies, if any.
    ///
    /// A missing or unreadable file is an empty session, not an error: the
    /// operator simply has to sign in again.
    pub fn load(&self) -> Vec<String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(stored) => stored.cookies,
            Err(_) => Vec::new(),
        }
    }

    /// Replace the stored cookies
    pub fn save(&self, cookies: &[String]) -> AppResult<()> {
        let stored = StoredSession {
            cookies: cookies.to_vec(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Forget the stored session
    pub fn clear(&self) -> AppResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Whether any session cookies are stored
    pub fn has_session(&self) -> bool {
        !self.load().is_empty()
    }
}
