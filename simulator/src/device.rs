//! The simulated device: store, flags and screen behind one value.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bulwark_secrets::{Passphrase, Password};
use bulwark_workflow::{
    AttemptOutcome, CredentialStore, DeviceMemory, FactoryReset, LockImage, Preferences,
    UserInterface,
};
use tracing::{error, info, warn};

use crate::error::SimError;
use crate::keystore::SoftKeystore;
use crate::terminal::InputStatus;

/// Store response when a password prompt came back without input.
pub const FAULT_INPUT_CLOSED: i32 = 5;

const SET_PASSWORD_TITLE: &str = "Set password";
const REPEAT_PASSWORD_TITLE: &str = "Repeat password";
const PASSWORD_MISMATCH: &str = "Passwords\ndo not match";

/// Device state rooted in one data directory.
pub struct SimDevice<U> {
    data_dir: PathBuf,
    prefs: Preferences,
    keystore: SoftKeystore,
    ui: U,
}

impl<U: UserInterface + InputStatus> SimDevice<U> {
    /// Load the device from `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if the directory cannot be created or the store
    /// record is unreadable.
    pub fn open(data_dir: &Path, ui: U) -> Result<Self, SimError> {
        fs::create_dir_all(data_dir)?;
        let prefs = Preferences::load(data_dir);
        let keystore = SoftKeystore::open(data_dir)?;
        if prefs.initialized && !keystore.is_provisioned() {
            error!(
                data_dir = %data_dir.display(),
                "device marked initialized but holds no credential"
            );
        }
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            prefs,
            keystore,
            ui,
        })
    }

    /// Provision a fresh device: ask for a password twice, store it, and
    /// mark the device initialized.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AlreadyInitialized`] if the device is set up, or
    /// the store/preferences error that stopped provisioning.
    pub fn setup(&mut self, mnemonic_passphrase: bool, max_attempts: u8) -> Result<(), SimError> {
        if self.prefs.initialized || self.keystore.is_provisioned() {
            return Err(SimError::AlreadyInitialized);
        }

        let mut password = Password::new();
        loop {
            let mut repeat = Password::new();
            self.ui.enter_secret(SET_PASSWORD_TITLE, &mut password);
            self.ui.enter_secret(REPEAT_PASSWORD_TITLE, &mut repeat);
            if self.ui.input_closed() {
                return Err(SimError::InputClosed);
            }
            if password.ct_eq(&repeat) {
                break;
            }
            self.ui.show_status(PASSWORD_MISMATCH, false);
        }

        self.keystore = SoftKeystore::create(&self.data_dir, &password, max_attempts)?;
        password.clear();

        self.prefs = Preferences {
            initialized: true,
            mnemonic_passphrase_enabled: mnemonic_passphrase,
        };
        self.prefs.save(&self.data_dir)?;
        info!(mnemonic_passphrase, "device initialized");
        Ok(())
    }

    #[must_use]
    pub const fn keystore(&self) -> &SoftKeystore {
        &self.keystore
    }

    /// Whether the keyboard went away during the last flow.
    #[must_use]
    pub fn input_closed(&self) -> bool {
        self.ui.input_closed()
    }
}

// Once the keyboard is closed nothing reaches the store: no attempt is
// counted and no seed is unlocked.
impl<U: InputStatus> CredentialStore for SimDevice<U> {
    fn verify_password(&mut self, password: &Password) -> AttemptOutcome {
        if self.ui.input_closed() {
            warn!("password prompt closed, not submitting attempt");
            return AttemptOutcome::Fault {
                code: FAULT_INPUT_CLOSED,
            };
        }
        self.keystore.verify_password(password)
    }

    fn unlock_seed(&mut self, passphrase: &Passphrase) -> bool {
        if self.ui.input_closed() {
            warn!("passphrase prompt closed, not unlocking seed");
            return false;
        }
        self.keystore.unlock_seed(passphrase)
    }

    fn is_locked(&self) -> bool {
        self.keystore.is_locked()
    }
}

impl<U> DeviceMemory for SimDevice<U> {
    fn is_initialized(&self) -> bool {
        self.prefs.is_initialized()
    }

    fn is_mnemonic_passphrase_enabled(&self) -> bool {
        self.prefs.is_mnemonic_passphrase_enabled()
    }
}

impl<U: UserInterface> UserInterface for SimDevice<U> {
    fn enter_secret(&mut self, title: &str, out: &mut Password) {
        self.ui.enter_secret(title, out);
    }

    fn show_status(&mut self, message: &str, dismiss_is_final: bool) {
        self.ui.show_status(message, dismiss_is_final);
    }

    fn pop_all_screens(&mut self) {
        self.ui.pop_all_screens();
    }

    fn draw_image(&mut self, image: LockImage) {
        self.ui.draw_image(image);
    }

    fn delay(&mut self, duration: Duration) {
        self.ui.delay(duration);
    }
}

impl<U> FactoryReset for SimDevice<U> {
    fn reset_to_factory(&mut self) {
        if let Err(e) = self.keystore.erase() {
            error!("failed to erase keystore during reset: {e}");
        }
        self.prefs = Preferences::default();
        if let Err(e) = self.prefs.save(&self.data_dir) {
            error!("failed to save preferences during reset: {e}");
        }
        info!("device reset to factory state");
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
