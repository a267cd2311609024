//! Software credential store for the simulated device.
//!
//! Keeps an Argon2id PHC hash of the device password and the attempt
//! counter in `{data_dir}/keystore.json`. A verified password derives the
//! retained seed (Argon2id over the password and a per-device salt); the
//! seed unlock mixes in the mnemonic passphrase with keyed BLAKE3.
//!
//! The counter belongs to the store: it is written to disk before the hash
//! is checked, cleared on success, and reaching the limit erases the
//! record.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use bulwark_secrets::{Passphrase, Password, SecretBuffer};
use bulwark_workflow::{AttemptOutcome, CredentialStore};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use zeroize::Zeroize;

use crate::error::SimError;

/// Attempt limit used when `--max-attempts` is not given.
pub const DEFAULT_MAX_ATTEMPTS: u8 = 10;

/// No credential has been provisioned.
pub const FAULT_NO_CREDENTIAL: i32 = 1;
/// The stored password hash does not parse.
pub const FAULT_CORRUPT_RECORD: i32 = 2;
/// The record could not be written or erased.
pub const FAULT_STORAGE: i32 = 3;
/// Retained seed derivation failed.
pub const FAULT_DERIVATION: i32 = 4;

const KEYSTORE_FILE: &str = "keystore.json";
const SEED_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct KeystoreRecord {
    password_hash: String,
    seed_salt: String,
    failed_attempts: u8,
    max_attempts: u8,
}

/// File-backed stand-in for the device's secure element.
pub struct SoftKeystore {
    dir: PathBuf,
    record: Option<KeystoreRecord>,
    retained_seed: Option<SecretBuffer>,
    bip39_seed: Option<SecretBuffer>,
}

impl SoftKeystore {
    /// Open the store in `dir`. A missing record yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Keystore`] if the record exists but is not valid
    /// JSON, or [`SimError::Io`] if it cannot be read.
    pub fn open(dir: &Path) -> Result<Self, SimError> {
        let path = dir.join(KEYSTORE_FILE);
        let record = match fs::read_to_string(&path) {
            Ok(contents) => Some(
                serde_json::from_str(&contents)
                    .map_err(|e| SimError::Keystore(format!("corrupt keystore record: {e}")))?,
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            dir: dir.to_path_buf(),
            record,
            retained_seed: None,
            bip39_seed: None,
        })
    }

    /// Provision a new credential in `dir`, replacing any existing record.
    ///
    /// `max_attempts` is raised to at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Keystore`] if hashing fails, or [`SimError::Io`]
    /// if the record cannot be written.
    pub fn create(dir: &Path, password: &Password, max_attempts: u8) -> Result<Self, SimError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| SimError::Keystore(format!("password hashing failed: {e}")))?
            .to_string();

        let record = KeystoreRecord {
            password_hash,
            seed_salt: SaltString::generate(&mut OsRng).as_str().to_owned(),
            failed_attempts: 0,
            max_attempts: max_attempts.max(1),
        };
        persist(dir, &record)?;
        info!(max_attempts = record.max_attempts, "credential provisioned");

        Ok(Self {
            dir: dir.to_path_buf(),
            record: Some(record),
            retained_seed: None,
            bip39_seed: None,
        })
    }

    /// Whether a credential is present.
    #[must_use]
    pub const fn is_provisioned(&self) -> bool {
        self.record.is_some()
    }

    /// Failed attempts since the last successful unlock.
    #[must_use]
    pub fn failed_attempts(&self) -> Option<u8> {
        self.record.as_ref().map(|r| r.failed_attempts)
    }

    /// Short BLAKE3 fingerprint of the unlocked seed, if any.
    #[must_use]
    pub fn seed_fingerprint(&self) -> Option<String> {
        self.bip39_seed.as_ref().map(|seed| fingerprint(seed.expose()))
    }

    /// Delete the record and forget every derived seed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the record exists but cannot be removed.
    pub fn erase(&mut self) -> Result<(), SimError> {
        self.record = None;
        self.retained_seed = None;
        self.bip39_seed = None;
        match fs::remove_file(self.dir.join(KEYSTORE_FILE)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn erase_exhausted(&mut self) -> AttemptOutcome {
        match self.erase() {
            Ok(()) => AttemptOutcome::AttemptsExhausted,
            Err(e) => {
                error!("failed to erase exhausted credential: {e}");
                AttemptOutcome::Fault {
                    code: FAULT_STORAGE,
                }
            }
        }
    }
}

impl CredentialStore for SoftKeystore {
    fn verify_password(&mut self, password: &Password) -> AttemptOutcome {
        let Some(record) = self.record.as_mut() else {
            error!("no credential provisioned");
            return AttemptOutcome::Fault {
                code: FAULT_NO_CREDENTIAL,
            };
        };

        if record.failed_attempts >= record.max_attempts {
            warn!("attempt limit already reached, erasing credential");
            return self.erase_exhausted();
        }

        record.failed_attempts = record.failed_attempts.saturating_add(1);
        if let Err(e) = persist(&self.dir, record) {
            error!("failed to record attempt: {e}");
            return AttemptOutcome::Fault {
                code: FAULT_STORAGE,
            };
        }

        let verified = match PasswordHash::new(&record.password_hash) {
            Ok(hash) => Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok(),
            Err(e) => {
                error!("stored password hash is unreadable: {e}");
                return AttemptOutcome::Fault {
                    code: FAULT_CORRUPT_RECORD,
                };
            }
        };

        if !verified {
            if record.failed_attempts >= record.max_attempts {
                warn!(
                    max_attempts = record.max_attempts,
                    "attempt limit reached, erasing credential"
                );
                return self.erase_exhausted();
            }
            let remaining_attempts = record.max_attempts.saturating_sub(record.failed_attempts);
            debug!(remaining_attempts, "password rejected");
            return AttemptOutcome::WrongPassword { remaining_attempts };
        }

        let retained = match derive_retained_seed(password.as_bytes(), &record.seed_salt) {
            Ok(seed) => seed,
            Err(e) => {
                error!("retained seed derivation failed: {e}");
                return AttemptOutcome::Fault {
                    code: FAULT_DERIVATION,
                };
            }
        };

        record.failed_attempts = 0;
        if let Err(e) = persist(&self.dir, record) {
            error!("failed to clear attempt counter: {e}");
            return AttemptOutcome::Fault {
                code: FAULT_STORAGE,
            };
        }

        self.retained_seed = Some(retained);
        AttemptOutcome::Ok
    }

    fn unlock_seed(&mut self, passphrase: &Passphrase) -> bool {
        let Some(retained) = self.retained_seed.as_ref() else {
            warn!("seed unlock requested while locked");
            return false;
        };
        let Ok(mut key) = <[u8; SEED_LEN]>::try_from(retained.expose()) else {
            error!("retained seed has unexpected length");
            return false;
        };

        let mut seed = [0u8; SEED_LEN];
        blake3::Hasher::new_keyed(&key)
            .update(passphrase.as_bytes())
            .finalize_xof()
            .fill(&mut seed);
        key.zeroize();

        let unlocked = SecretBuffer::new(&seed);
        seed.zeroize();
        info!(fingerprint = %fingerprint(unlocked.expose()), "seed unlocked");
        self.bip39_seed = Some(unlocked);
        true
    }

    fn is_locked(&self) -> bool {
        self.retained_seed.is_none()
    }
}

fn derive_retained_seed(password: &[u8], salt: &str) -> Result<SecretBuffer, argon2::Error> {
    let mut output = [0u8; SEED_LEN];
    Argon2::default().hash_password_into(password, salt.as_bytes(), &mut output)?;
    let seed = SecretBuffer::new(&output);
    output.zeroize();
    Ok(seed)
}

fn fingerprint(seed: &[u8]) -> String {
    let hex = blake3::hash(seed).to_hex();
    hex.as_str().get(..8).unwrap_or_default().to_owned()
}

fn persist(dir: &Path, record: &KeystoreRecord) -> io::Result<()> {
    let path = dir.join(KEYSTORE_FILE);
    let tmp = dir.join(".keystore.json.tmp");

    let json = serde_json::to_string_pretty(record)?;
    fs::write(&tmp, json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp, &path)
}

// ── Tests ──────────────────────────────────────────────────────────
