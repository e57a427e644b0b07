//! User profile domain model.

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user, as reported by the backend.
///
/// Owned by the session; components that render identity share it by
/// reference. It is never mutated in place, only replaced wholesale on
/// login, signup, or verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}
