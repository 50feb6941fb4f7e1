//! Credential protection and session validation core for the Lumen game
//! launcher.
//!
//! The launcher shell (windowing, download pipeline, game process) sits on
//! top of this crate and injects the collaborators at its composition root:
//! a data directory for the stores, an [`api::AuthClient`] for remote token
//! checks, and a [`storage::SettingsStore`] holding the persisted user.
//!
//! Two subsystems live here:
//! - credential persistence: a sealed-password file store with an OS
//!   keychain fallback ([`credentials`])
//! - session upkeep: a five-minute validation loop that ends the session
//!   the moment the token stops being good ([`session`])

pub mod api;
pub mod credentials;
pub mod crypto;
pub mod logging;
pub mod paths;
pub mod session;
pub mod storage;

pub use api::{ApiError, AuthClient, AuthStatus, HttpAuthClient};
pub use credentials::{
    CredentialError, CredentialManager, FileCredentialStore, LoadOutcome, SavedCredentials,
};
pub use crypto::CryptoError;
pub use session::{AuthUser, SessionEvent, SessionValidator};
pub use storage::{JsonSettings, MemorySettings, SettingsStore, StorageError};
