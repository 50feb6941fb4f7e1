//! Primary + fallback credential orchestration.
//!
//! The file store is authoritative. The keychain is a best-effort mirror:
//! saves that fail against the keychain still succeed, and the mirror is
//! only consulted when the file store has nothing usable. A corrupt primary
//! record is cleared before falling back, which is the migration path for
//! records written by older launcher builds.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::storage::{keys, SettingsStore};

use super::keyring::{KeyringStore, SERVICE_NAME};
use super::store::{CredentialError, FileCredentialStore, LoadOutcome, SavedCredentials};

pub struct CredentialManager {
    files: FileCredentialStore,
    keyring: KeyringStore,
    settings: Arc<dyn SettingsStore>,
}

impl CredentialManager {
    pub fn new(data_root: &Path, settings: Arc<dyn SettingsStore>) -> Result<Self, CredentialError> {
        Ok(Self {
            files: FileCredentialStore::new(data_root)?,
            keyring: KeyringStore::new(SERVICE_NAME),
            settings,
        })
    }

    /// Save credentials to the file store and mirror them to the keychain.
    /// `remember == false` clears everything instead.
    pub fn save(&self, login: &str, password: &str, remember: bool) -> Result<(), CredentialError> {
        self.files.save(login, password, remember)?;

        if !remember {
            self.forget_fallback(login);
            return Ok(());
        }

        self.settings.set(keys::SAVED_LOGIN, Some(json!(login)))?;
        self.settings.set(keys::REMEMBER_ME, Some(json!(true)))?;
        if let Err(err) = self.keyring.store(login, password) {
            warn!(error = %err, "keychain mirror failed, file store remains authoritative");
        }
        Ok(())
    }

    /// Load remembered credentials, falling back to the keychain when the
    /// file store has nothing usable.
    pub fn load(&self) -> Result<LoadOutcome, CredentialError> {
        match self.files.load()? {
            LoadOutcome::Loaded(creds) => return Ok(LoadOutcome::Loaded(creds)),
            LoadOutcome::Corrupt => {
                warn!("primary credential record corrupt, clearing before fallback");
                self.files.clear()?;
            }
            LoadOutcome::Absent => {}
        }

        let login = self
            .settings
            .get(keys::SAVED_LOGIN)?
            .and_then(|value| value.as_str().map(str::to_owned));
        let remember = self
            .settings
            .get(keys::REMEMBER_ME)?
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        let Some(login) = login else {
            return Ok(LoadOutcome::Absent);
        };
        if !remember {
            return Ok(LoadOutcome::Absent);
        }

        match self.keyring.password(&login) {
            Ok(Some(password)) => {
                debug!(login, "credentials recovered from OS keychain");
                Ok(LoadOutcome::Loaded(SavedCredentials {
                    login,
                    password,
                    remember: true,
                }))
            }
            Ok(None) => Ok(LoadOutcome::Absent),
            Err(err) => {
                debug!(error = %err, "keychain unavailable, treating as absent");
                Ok(LoadOutcome::Absent)
            }
        }
    }

    /// Clear the file store, the keychain mirror, and the settings mirror.
    pub fn clear(&self) -> Result<(), CredentialError> {
        let login = self
            .settings
            .get(keys::SAVED_LOGIN)?
            .and_then(|value| value.as_str().map(str::to_owned));

        self.files.clear()?;
        if let Some(login) = login {
            if let Err(err) = self.keyring.delete(&login) {
                debug!(error = %err, "keychain entry removal failed");
            }
        }
        // Scrub the mirror even when the login key is already gone, so a
        // partially written mirror cannot leave a stray remember flag
        self.scrub_mirror();
        Ok(())
    }

    fn forget_fallback(&self, login: &str) {
        if let Err(err) = self.keyring.delete(login) {
            debug!(error = %err, "keychain entry removal failed");
        }
        self.scrub_mirror();
    }

    fn scrub_mirror(&self) {
        for key in [keys::SAVED_LOGIN, keys::REMEMBER_ME] {
            if let Err(err) = self.settings.set(key, None) {
                warn!(key, error = %err, "settings mirror removal failed");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
