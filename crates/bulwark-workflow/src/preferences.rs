//! Non-sensitive device flags, stored as plain JSON next to the keystore.
//!
//! Readable before unlock: the workflow needs them to decide whether to
//! prompt at all and whether to ask for a mnemonic passphrase.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::DeviceMemory;
use crate::error::WorkflowError;

/// Persistent device flags.
///
/// Persisted to `{data_dir}/device.json`. All fields default to a fresh,
/// uninitialized device.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Whether setup has completed (password and seed exist).
    #[serde(default)]
    pub initialized: bool,

    /// Whether a mnemonic passphrase is requested at every unlock.
    #[serde(default)]
    pub mnemonic_passphrase_enabled: bool,
}

impl DeviceMemory for Preferences {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_mnemonic_passphrase_enabled(&self) -> bool {
        self.mnemonic_passphrase_enabled
    }
}

// ── File I/O ───────────────────────────────────────────────────────

const PREFERENCES_FILE: &str = "device.json";

impl Preferences {
    /// Load preferences from `{data_dir}/device.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON, i.e. the device looks uninitialized.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| {
                serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), "ignoring corrupt preferences: {e}");
                    Self::default()
                })
            },
        )
    }

    /// Persist preferences to `{data_dir}/device.json`.
    ///
    /// Writes to a `.tmp` file first and renames it into place.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Io`] if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> Result<(), WorkflowError> {
        let path = data_dir.join(PREFERENCES_FILE);
        let tmp = data_dir.join(".device.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WorkflowError::Preferences(e.to_string()))?;

        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
