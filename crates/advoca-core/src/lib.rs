pub mod analysis;
pub mod backend;
pub mod case;
pub mod credentials;
pub mod error;
pub mod files;
pub mod guard;
pub mod judgment;
pub mod notify;
pub mod session;
pub mod session_manager;
pub mod upload;
pub mod user;
pub mod validate;

#[cfg(test)]
mod test_support;

// Re-export the types nearly every consumer touches.
pub use error::{AdvocaError, Result};
pub use session::{Session, SessionHandle};
pub use user::UserProfile;
