//! Credential persistence for the login form.
//!
//! This module provides:
//! - `FileCredentialStore`: three-artifact on-disk store with a sealed secret
//! - `KeyringStore`: OS keychain fallback storage
//! - `CredentialManager`: primary + fallback orchestration
//!
//! The login is stored unencrypted so the UI can show who was remembered;
//! only the password is sealed.

pub mod keyring;
pub mod manager;
pub mod store;

pub use self::keyring::KeyringStore;
pub use manager::CredentialManager;
pub use store::{CredentialError, FileCredentialStore, LoadOutcome, SavedCredentials};
