//! OS keychain fallback storage.
//!
//! Passwords land in the platform keychain (Keychain on macOS, Credential
//! Manager on Windows, Secret Service on Linux) under a fixed service name,
//! keyed by login. The keychain only holds the password; the login and
//! remember flag live in the settings file, wired up by the manager.

use keyring::Entry;
use tracing::debug;

use super::store::CredentialError;

/// Service name the launcher registers its keychain entries under
pub const SERVICE_NAME: &str = "lumen-launcher";

pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, login: &str) -> Result<Entry, CredentialError> {
        Ok(Entry::new(&self.service, login)?)
    }

    /// Store a password for a login in the OS keychain.
    pub fn store(&self, login: &str, password: &str) -> Result<(), CredentialError> {
        self.entry(login)?.set_password(password)?;
        debug!(login, "password mirrored to OS keychain");
        Ok(())
    }

    /// Retrieve the password for a login. `Ok(None)` when no entry exists.
    pub fn password(&self, login: &str) -> Result<Option<String>, CredentialError> {
        match self.entry(login)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete the keychain entry for a login; idempotent.
    pub fn delete(&self, login: &str) -> Result<(), CredentialError> {
        match self.entry(login)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
