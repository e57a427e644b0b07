//! Shared test doubles for the core crate's unit tests.

use std::sync::Mutex;

use crate::credentials::{CredentialPair, CredentialStore};
use crate::error::{AdvocaError, Result};
use crate::user::UserProfile;

/// In-memory credential store with an optional failure mode for the
/// logout-never-fails tests.
#[derive(Default)]
pub(crate) struct MemoryCredentialStore {
    pair: Mutex<Option<CredentialPair>>,
    fail_clear: bool,
}

impl MemoryCredentialStore {
    pub(crate) fn failing_clear() -> Self {
        Self {
            pair: Mutex::new(None),
            fail_clear: true,
        }
    }

    pub(crate) fn with_pair(token: &str, user: &UserProfile) -> Self {
        let store = Self::default();
        store.save(token, user).unwrap();
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, token: &str, user: &UserProfile) -> Result<()> {
        *self.pair.lock().unwrap() = Some(CredentialPair {
            token: token.to_string(),
            user: user.clone(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<CredentialPair>> {
        Ok(self.pair.lock().unwrap().clone())
    }

    fn clear(&self) -> Result<()> {
        if self.fail_clear {
            return Err(AdvocaError::io("store unavailable"));
        }
        *self.pair.lock().unwrap() = None;
        Ok(())
    }
}

pub(crate) fn test_user() -> UserProfile {
    UserProfile {
        id: 1,
        email: "a@b.com".to_string(),
        name: "A".to_string(),
    }
}
