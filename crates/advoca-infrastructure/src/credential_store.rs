//! Filesystem-backed credential persistence.

use std::fs;
use std::path::{Path, PathBuf};

use advoca_core::credentials::{CredentialPair, CredentialStore};
use advoca_core::error::{AdvocaError, Result};
use advoca_core::user::UserProfile;

use crate::paths::AdvocaPaths;

/// Stores the bearer token and cached user profile as two files under the
/// advoca configuration directory.
///
/// The pair is all-or-nothing: a load that finds only one half, or a user
/// profile that no longer parses, clears whatever is on disk and reports no
/// credentials rather than handing back a half-usable session.
pub struct FsCredentialStore {
    base_dir: PathBuf,
}

impl FsCredentialStore {
    /// Creates a store rooted at an explicit directory. Used by tests; the
    /// application uses [`default_location`](Self::default_location).
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates the store at the platform configuration directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AdvocaPaths::config_dir()?))
    }

    fn token_path(&self) -> PathBuf {
        self.base_dir.join("token")
    }

    fn user_path(&self) -> PathBuf {
        self.base_dir.join("user.json")
    }

    fn remove_if_present(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdvocaError::from(e)),
        }
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }
}

impl CredentialStore for FsCredentialStore {
    fn save(&self, token: &str, user: &UserProfile) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;

        let profile = serde_json::to_string_pretty(user)?;
        fs::write(self.user_path(), profile)?;

        let token_path = self.token_path();
        fs::write(&token_path, token)?;
        Self::restrict_permissions(&token_path)?;

        tracing::debug!("[Credentials] Saved pair for {}", user.email);
        Ok(())
    }

    fn load(&self) -> Result<Option<CredentialPair>> {
        let token = match fs::read_to_string(self.token_path()) {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            Ok(_) => {
                self.clear()?;
                return Ok(None);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Token is the anchor; an orphaned profile is stale.
                self.clear()?;
                return Ok(None);
            }
            Err(e) => return Err(AdvocaError::from(e)),
        };

        let raw_profile = match fs::read_to_string(self.user_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.clear()?;
                return Ok(None);
            }
            Err(e) => return Err(AdvocaError::from(e)),
        };

        let user: UserProfile = match serde_json::from_str(&raw_profile) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("[Credentials] Discarding corrupt cached profile: {}", e);
                self.clear()?;
                return Ok(None);
            }
        };

        Ok(Some(CredentialPair { token, user }))
    }

    fn clear(&self) -> Result<()> {
        Self::remove_if_present(&self.token_path())?;
        Self::remove_if_present(&self.user_path())?;
        Ok(())
    }
}
