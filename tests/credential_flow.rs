//! End-to-end credential flow: seal, persist, reload, forget.

use std::sync::Arc;

use anyhow::Result;
use lumen_launcher_core::{
    storage::keys, CredentialManager, JsonSettings, LoadOutcome, SettingsStore,
};
use serde_json::json;

#[test]
fn remembered_login_survives_a_relaunch() -> Result<()> {
    let data_root = tempfile::tempdir()?;
    let settings: Arc<dyn SettingsStore> = Arc::new(JsonSettings::open(data_root.path())?);

    // First launch: the user logs in and ticks "remember me"
    {
        let manager = CredentialManager::new(data_root.path(), settings.clone())?;
        manager.save("alice@x.com", "P@ss1!", true)?;
    }

    // Second launch: a fresh manager over the same data root
    let settings: Arc<dyn SettingsStore> = Arc::new(JsonSettings::open(data_root.path())?);
    assert_eq!(settings.get(keys::SAVED_LOGIN)?, Some(json!("alice@x.com")));

    let manager = CredentialManager::new(data_root.path(), settings.clone())?;
    match manager.load()? {
        LoadOutcome::Loaded(creds) => {
            assert_eq!(creds.login, "alice@x.com");
            assert_eq!(creds.password, "P@ss1!");
            assert!(creds.remember);
        }
        other => panic!("expected remembered credentials, got {:?}", other),
    }

    // The user unticks "remember me": everything is forgotten
    manager.save("alice@x.com", "P@ss1!", false)?;
    assert_eq!(manager.load()?, LoadOutcome::Absent);
    assert_eq!(settings.get(keys::SAVED_LOGIN)?, None);

    Ok(())
}
