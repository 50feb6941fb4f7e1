//! Application data-root resolution.
//!
//! The stores in this crate take their root directory as a constructor
//! argument; the composition root usually passes [`data_root`]. Tests pass
//! a temp directory instead.

use std::path::PathBuf;

use crate::storage::StorageError;

/// Application directory name under the per-user data directory
pub const APP_DIR: &str = "lumen-launcher";

/// Per-user data root for the launcher, e.g. `~/.local/share/lumen-launcher`.
pub fn data_root() -> Result<PathBuf, StorageError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(StorageError::NoDataDir)
}
