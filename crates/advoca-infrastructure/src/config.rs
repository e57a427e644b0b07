//! Client configuration loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use advoca_core::error::{AdvocaError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::AdvocaPaths;

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_k() -> usize {
    10
}

fn default_precedent_k() -> usize {
    5
}

/// Client configuration, persisted as `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Neighbor count for similar-case retrieval.
    #[serde(default = "default_k")]
    pub default_k: usize,
    /// Neighbor count for precedent retrieval.
    #[serde(default = "default_precedent_k")]
    pub default_precedent_k: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_k: default_k(),
            default_precedent_k: default_precedent_k(),
        }
    }
}

impl ClientConfig {
    /// The base URL with an environment override applied.
    ///
    /// `ADVOCA_API_URL` wins over the configured value; trailing slashes
    /// are dropped either way so path joining stays uniform.
    pub fn resolve_base_url(&self, env_override: Option<&str>) -> String {
        let raw = env_override
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.base_url);
        raw.trim_end_matches('/').to_string()
    }
}

/// Loads and caches the client configuration.
///
/// A missing file is written out with defaults on first load so users have
/// something to edit; a file that fails to parse is an error rather than a
/// silent fallback.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    cached: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates the service over the platform configuration file.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AdvocaPaths::config_file()?))
    }

    /// Returns the configuration, loading it on first access.
    pub fn get(&self) -> Result<ClientConfig> {
        {
            let cached = self.cached.read().expect("config lock poisoned");
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        *self.cached.write().expect("config lock poisoned") = Some(loaded.clone());
        Ok(loaded)
    }

    /// Drops the cache, forcing a reload on next access.
    pub fn invalidate(&self) {
        *self.cached.write().expect("config lock poisoned") = None;
    }

    fn load(&self) -> Result<ClientConfig> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| {
                AdvocaError::serialization("toml", format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = ClientConfig::default();
                self.write_default(&config)?;
                Ok(config)
            }
            Err(e) => Err(AdvocaError::from(e)),
        }
    }

    fn write_default(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(config)
            .map_err(|e| AdvocaError::serialization("toml", e.to_string()))?;
        fs::write(&self.path, rendered)?;
        tracing::info!("[Config] Wrote default configuration to {}", self.path.display());
        Ok(())
    }
}
