pub mod config;
pub mod credential_store;
pub mod paths;

pub use crate::config::{ClientConfig, ConfigService};
pub use crate::credential_store::FsCredentialStore;
pub use crate::paths::AdvocaPaths;
