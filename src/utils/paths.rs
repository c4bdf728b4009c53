//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything persisted lives under ~/.ledgerlens/.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Ledgerlens directory (~/.ledgerlens/)
pub fn ledgerlens_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".ledgerlens"))
}

/// Get the config file path (~/.ledgerlens/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(ledgerlens_dir()?.join("config.json"))
}

/// Get the session cookie file path (~/.ledgerlens/session.json)
pub fn session_path() -> AppResult<PathBuf> {
    Ok(ledgerlens_dir()?.join("session.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Ledgerlens directory, creating if it doesn't exist
pub fn ensure_ledgerlens_dir() -> AppResult<PathBuf> {
    let path = ledgerlens_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
