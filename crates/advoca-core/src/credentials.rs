//! Durable credential persistence contract.

use crate::error::Result;
use crate::user::UserProfile;

/// A persisted `{token, user}` pair.
///
/// The two fields are only ever written and cleared together; a pair with
/// one half missing must never be observable.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialPair {
    pub token: String,
    pub user: UserProfile,
}

/// Durable storage for the session credential, surviving restarts.
///
/// Implementations must be fail-safe rather than fail-loud: `load` returns
/// the pair only when both entries are present and the user entry parses,
/// and clears whatever remains otherwise.
pub trait CredentialStore: Send + Sync {
    /// Persists the token and user profile together, overwriting any prior
    /// pair.
    fn save(&self, token: &str, user: &UserProfile) -> Result<()>;

    /// Returns the stored pair, or `None` when absent or unreadable.
    ///
    /// A corrupt or half-written pair is cleared before `None` is returned.
    fn load(&self) -> Result<Option<CredentialPair>>;

    /// Removes both entries. Idempotent.
    fn clear(&self) -> Result<()>;
}
