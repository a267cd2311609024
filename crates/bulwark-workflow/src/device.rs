//! Collaborator contracts the unlock workflow runs against.
//!
//! Every call is blocking: a prompt returns once the user has confirmed
//! their input, a status screen returns once it has been dismissed, and a
//! store call returns once verification is complete.

use std::time::Duration;

use bulwark_secrets::{Passphrase, Password};

// ---------------------------------------------------------------------------
// Credential store
// ---------------------------------------------------------------------------

/// Verdict of a single password verification.
///
/// Produced and consumed within one evaluation step; the store keeps the
/// authoritative attempt counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Password verified; the store is unlocked.
    Ok,
    /// Password rejected; `remaining_attempts` tries are left before reset.
    WrongPassword {
        /// Attempts left as reported by the store.
        remaining_attempts: u8,
    },
    /// The final attempt failed. The store has wiped its credential.
    AttemptsExhausted,
    /// Any other store response. Treated as unrecoverable.
    Fault {
        /// Store-specific diagnostic code.
        code: i32,
    },
}

/// Secure element / keystore holding the device credential.
pub trait CredentialStore {
    /// Verify `password` and update the store's attempt counter.
    fn verify_password(&mut self, password: &Password) -> AttemptOutcome;

    /// Derive and unlock the seed with `passphrase` (empty for none).
    ///
    /// Only called after [`verify_password`](Self::verify_password)
    /// returned [`AttemptOutcome::Ok`].
    fn unlock_seed(&mut self, passphrase: &Passphrase) -> bool;

    /// Whether the store is currently locked.
    fn is_locked(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Device memory
// ---------------------------------------------------------------------------

/// Persistent device flags.
pub trait DeviceMemory {
    /// Whether the device has been set up (password and seed exist).
    fn is_initialized(&self) -> bool;

    /// Whether the user opted into a mnemonic passphrase.
    fn is_mnemonic_passphrase_enabled(&self) -> bool;
}

// ---------------------------------------------------------------------------
// User interface
// ---------------------------------------------------------------------------

/// Images shown while the seed unlock blocks the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockImage {
    /// Closed padlock.
    Locked,
    /// Open padlock.
    Unlocked,
}

/// Screen and input subsystem.
pub trait UserInterface {
    /// Block on a secret-entry screen titled `title` and write the entered
    /// text into `out`.
    fn enter_secret(&mut self, title: &str, out: &mut Password);

    /// Show `message` and block until the user dismisses it.
    fn show_status(&mut self, message: &str, dismiss_is_final: bool);

    /// Drop every screen on the stack.
    fn pop_all_screens(&mut self);

    /// Clear the frame buffer, draw `image` centred and flush it.
    ///
    /// Bypasses the screen stack: nothing else renders while the seed
    /// unlock is running.
    fn draw_image(&mut self, image: LockImage);

    /// Busy-wait for `duration`.
    fn delay(&mut self, duration: Duration);
}

// ---------------------------------------------------------------------------
// Factory reset
// ---------------------------------------------------------------------------

/// Device-wide setup flow.
pub trait FactoryReset {
    /// Restart the device in its factory (uninitialized) workflow.
    fn reset_to_factory(&mut self);
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// Everything the unlock workflow needs from the device.
pub trait Device: CredentialStore + DeviceMemory + UserInterface + FactoryReset {}

impl<T: CredentialStore + DeviceMemory + UserInterface + FactoryReset + ?Sized> Device for T {}
