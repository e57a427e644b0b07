//! Unified path management for advoca configuration files.
//!
//! Everything the client persists lives under one per-user configuration
//! directory:
//!
//! ```text
//! ~/.config/advoca/       (platform equivalent via dirs)
//! ├── config.toml         # client configuration
//! ├── token               # raw bearer token
//! └── user.json           # cached user profile
//! ```

use std::path::PathBuf;

use advoca_core::error::{AdvocaError, Result};

/// Resolves the advoca paths for the current platform.
pub struct AdvocaPaths;

impl AdvocaPaths {
    /// The advoca configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("advoca"))
            .ok_or_else(|| AdvocaError::config("Cannot find configuration directory"))
    }

    /// Path of the client configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the cached bearer token.
    pub fn token_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("token"))
    }

    /// Path of the cached user profile.
    pub fn user_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("user.json"))
    }
}
