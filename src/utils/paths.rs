//! Cross-Platform Path Utilities
//!
//! Functions for resolving the application's directories across platforms
//! (~/.trust-recon/ and the files inside it).

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Trust Recon directory (~/.trust-recon/)
pub fn trust_recon_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".trust-recon"))
}

/// Get the config file path (~/.trust-recon/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(trust_recon_dir()?.join("config.json"))
}

/// Get the database file path (~/.trust-recon/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(trust_recon_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Trust Recon directory, creating it if it doesn't exist
pub fn ensure_trust_recon_dir() -> AppResult<PathBuf> {
    let path = trust_recon_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
