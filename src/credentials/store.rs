//! File-based credential store.
//!
//! A remembered login is three independent artifacts under
//! `<data-root>/secure/`: the raw UTF-8 login, the sealed password blob,
//! and a text-rendered remember flag. The record counts as present only
//! when all three exist and the flag parses `true`; anything partial is
//! absent. The three writes are not atomic as a group - a crash between
//! them leaves a partial record, which the next `load` reports as absent.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::crypto::{self, CryptoError};
use crate::storage::StorageError;

/// Subdirectory holding the credential artifacts
const SECURE_DIR: &str = "secure";

/// Login artifact (raw UTF-8, unencrypted for display)
const LOGIN_FILE: &str = "login.dat";

/// Sealed password artifact
const SECRET_FILE: &str = "secret.dat";

/// Remember-flag artifact ("true"/"false" text)
const REMEMBER_FILE: &str = "remember.dat";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("keychain access failed: {0}")]
    Keyring(#[from] ::keyring::Error),

    #[error(transparent)]
    Settings(#[from] StorageError),
}

/// One remembered login, password already unsealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCredentials {
    pub login: String,
    pub password: String,
    pub remember: bool,
}

/// Result of a credential load.
///
/// `Absent` and `Corrupt` are distinct on purpose: a corrupt record is
/// evidence of tampering or a format change and callers may want to clear
/// it, while absence is the normal "nothing remembered" case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Absent,
    Corrupt,
    Loaded(SavedCredentials),
}

pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Create a store rooted at the given application data root.
    /// The `secure/` subdirectory is created eagerly.
    pub fn new(data_root: &Path) -> Result<Self, CredentialError> {
        let dir = data_root.join(SECURE_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Save a credential record, or clear the store when `remember` is false.
    pub fn save(&self, login: &str, password: &str, remember: bool) -> Result<(), CredentialError> {
        if !remember {
            debug!("remember disabled, clearing stored credentials");
            return self.clear();
        }

        let sealed = crypto::seal(password)?;
        std::fs::write(self.dir.join(LOGIN_FILE), login.as_bytes())?;
        std::fs::write(self.dir.join(SECRET_FILE), &sealed)?;
        std::fs::write(self.dir.join(REMEMBER_FILE), "true")?;
        debug!(login, "credentials saved");
        Ok(())
    }

    /// Load the remembered credential record, if any.
    pub fn load(&self) -> Result<LoadOutcome, CredentialError> {
        let login_path = self.dir.join(LOGIN_FILE);
        let secret_path = self.dir.join(SECRET_FILE);
        let remember_path = self.dir.join(REMEMBER_FILE);

        // All-or-nothing presence: a partial record is no record
        if !login_path.exists() || !secret_path.exists() || !remember_path.exists() {
            return Ok(LoadOutcome::Absent);
        }

        let remember_text = std::fs::read_to_string(&remember_path)?;
        let remember = match remember_text.trim().parse::<bool>() {
            Ok(flag) => flag,
            Err(_) => {
                warn!("remember flag artifact does not parse as a boolean");
                return Ok(LoadOutcome::Corrupt);
            }
        };
        if !remember {
            return Ok(LoadOutcome::Absent);
        }

        let login = match String::from_utf8(std::fs::read(&login_path)?) {
            Ok(login) => login,
            Err(_) => {
                warn!("login artifact is not valid UTF-8");
                return Ok(LoadOutcome::Corrupt);
            }
        };

        let sealed = std::fs::read(&secret_path)?;
        let password = match crypto::open(&sealed) {
            Ok(password) => password,
            Err(err) => {
                warn!(error = %err, "secret artifact failed to unseal");
                return Ok(LoadOutcome::Corrupt);
            }
        };

        debug!(login, "credentials loaded");
        Ok(LoadOutcome::Loaded(SavedCredentials {
            login,
            password,
            remember: true,
        }))
    }

    /// Delete all credential artifacts. Missing artifacts are ignored, so
    /// this is idempotent and safe on an empty store.
    pub fn clear(&self) -> Result<(), CredentialError> {
        for name in [LOGIN_FILE, SECRET_FILE, REMEMBER_FILE] {
            match std::fs::remove_file(self.dir.join(name)) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    pub(crate) fn artifact_dir(&self) -> &Path {
        &self.dir
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_load_scenario() {
        let (_dir, store) = store();
        store.save("alice@x.com", "P@ss1!", true).unwrap();

        match store.load().unwrap() {
            LoadOutcome::Loaded(creds) => {
                assert_eq!(creds.login, "alice@x.com");
                assert_eq!(creds.password, "P@ss1!");
                assert!(creds.remember);
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        for artifact in [LOGIN_FILE, SECRET_FILE, REMEMBER_FILE] {
            let (_dir, store) = store();
            store.save("alice@x.com", "P@ss1!", true).unwrap();

            std::fs::remove_file(store.artifact_dir().join(artifact)).unwrap();
            assert_eq!(store.load().unwrap(), LoadOutcome::Absent);
        }
    }

    #[test]
    fn test_remember_false_clears() {
        let (_dir, store) = store();
        store.save("alice@x.com", "P@ss1!", true).unwrap();
        store.save("alice@x.com", "P@ss1!", false).unwrap();

        assert_eq!(store.load().unwrap(), LoadOutcome::Absent);
        for name in [LOGIN_FILE, SECRET_FILE, REMEMBER_FILE] {
            assert!(!store.artifact_dir().join(name).exists());
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = store();
        store.clear().unwrap();
        store.clear().unwrap();

        store.save("alice@x.com", "P@ss1!", true).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), LoadOutcome::Absent);
    }

    #[test]
    fn test_bad_remember_flag_is_corrupt() {
        let (_dir, store) = store();
        store.save("alice@x.com", "P@ss1!", true).unwrap();

        std::fs::write(store.artifact_dir().join(REMEMBER_FILE), "maybe").unwrap();
        assert_eq!(store.load().unwrap(), LoadOutcome::Corrupt);
    }

    #[test]
    fn test_remember_flag_false_on_disk_is_absent() {
        let (_dir, store) = store();
        store.save("alice@x.com", "P@ss1!", true).unwrap();

        std::fs::write(store.artifact_dir().join(REMEMBER_FILE), "false").unwrap();
        assert_eq!(store.load().unwrap(), LoadOutcome::Absent);
    }

    #[test]
    fn test_tampered_secret_is_corrupt() {
        let (_dir, store) = store();
        store.save("alice@x.com", "P@ss1!", true).unwrap();

        std::fs::write(store.artifact_dir().join(SECRET_FILE), b"not a sealed blob").unwrap();
        assert_eq!(store.load().unwrap(), LoadOutcome::Corrupt);
    }

    #[test]
    fn test_empty_password_roundtrip() {
        let (_dir, store) = store();
        store.save("alice@x.com", "", true).unwrap();

        match store.load().unwrap() {
            LoadOutcome::Loaded(creds) => assert_eq!(creds.password, ""),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }
}
