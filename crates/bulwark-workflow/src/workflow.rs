//! Unlock orchestration: gate, password loop, seed unlock.
//!
//! ```text
//! Gate ──(uninitialized | unlocked)──────────────────────► Done(NothingToUnlock)
//!  │
//!  ▼
//! PromptPassword ──► Evaluate ──(wrong password)──► PromptPassword
//!                       │  └──(attempts exhausted)──────► Done(FactoryReset)
//!                       ▼
//!                  Bip39Unlock ──────────────────────────► Done(Unlocked)
//! ```
//!
//! The password buffer lives in the frame that starts the flow and is
//! borrowed by each state; it is wiped every time an evaluation ends,
//! including when evaluation fails fatally.

use std::time::Duration;

use bulwark_secrets::{Passphrase, Password, WipeGuard};
use tracing::{debug, info};

use crate::device::{Device, LockImage};
use crate::error::Fatal;
use crate::evaluator::{unlock_and_handle_error, Verdict};
use crate::passphrase::get_mnemonic_passphrase;
use crate::status::ENTER_PASSWORD_TITLE;

/// How long the closed padlock stays on screen before the open one.
pub const UNLOCK_ANIMATION_HOLD: Duration = Duration::from_millis(1200);

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    /// Decide whether an unlock is needed at all.
    Gate,
    /// Ask the user for the device password.
    PromptPassword,
    /// Submit the entered password to the store.
    Evaluate,
    /// Password verified; obtain the passphrase and unlock the seed.
    Bip39Unlock,
    /// Terminal.
    Done(UnlockOutcome),
}

/// How a run of the flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Password verified and seed unlocked.
    Unlocked,
    /// The device was uninitialized or already unlocked; nothing happened.
    NothingToUnlock,
    /// Attempts were exhausted and the factory reset flow was started.
    FactoryReset,
}

impl UnlockOutcome {
    /// `true` unless the device was reset.
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::FactoryReset)
    }
}

/// The unlock workflow bound to one device.
///
/// Each public entry point runs to a terminal state; a new request starts
/// a new run.
pub struct UnlockWorkflow<'d, D: Device + ?Sized> {
    device: &'d mut D,
}

impl<'d, D: Device + ?Sized> UnlockWorkflow<'d, D> {
    /// Bind the workflow to `device`.
    pub fn new(device: &'d mut D) -> Self {
        Self { device }
    }

    /// Run the full flow from [`UnlockState::Gate`].
    ///
    /// # Errors
    ///
    /// Returns [`Fatal`] if the store gives an unknown answer or the seed
    /// unlock fails; the caller must abort.
    pub fn unlock(&mut self) -> Result<UnlockOutcome, Fatal> {
        let mut password = Password::new();
        self.run(UnlockState::Gate, &mut password)
    }

    /// Continue the flow with a password that was entered elsewhere (e.g.
    /// on a paired host).
    ///
    /// A wrong password falls back to the on-device prompt loop. `password`
    /// is wiped before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Same as [`unlock`](Self::unlock).
    pub fn enter_done(&mut self, password: &mut Password) -> Result<UnlockOutcome, Fatal> {
        let mut password = WipeGuard::new(password);
        self.run(UnlockState::Evaluate, &mut password)
    }

    /// Obtain the mnemonic passphrase (if enabled) and unlock the seed.
    ///
    /// Must only be called once the password has been verified.
    ///
    /// # Errors
    ///
    /// Returns [`Fatal::SeedUnlockFailed`] if the store refuses the seed
    /// unlock.
    pub fn unlock_bip39(&mut self) -> Result<(), Fatal> {
        // Empty passphrase by default.
        let mut passphrase = Passphrase::new();
        if self.device.is_mnemonic_passphrase_enabled() {
            get_mnemonic_passphrase(&mut *self.device, &mut passphrase);
        }

        self.play_unlock_animation();

        if !self.device.unlock_seed(&passphrase) {
            return Err(Fatal::SeedUnlockFailed);
        }
        passphrase.clear();
        Ok(())
    }

    fn run(
        &mut self,
        mut state: UnlockState,
        password: &mut Password,
    ) -> Result<UnlockOutcome, Fatal> {
        loop {
            debug!(?state, "unlock step");
            state = match state {
                UnlockState::Gate => self.gate(),
                UnlockState::PromptPassword => {
                    self.device.pop_all_screens();
                    self.device.enter_secret(ENTER_PASSWORD_TITLE, password);
                    UnlockState::Evaluate
                }
                UnlockState::Evaluate => {
                    let password = WipeGuard::new(&mut *password);
                    match unlock_and_handle_error(&mut *self.device, &password)? {
                        Verdict::Unlocked => UnlockState::Bip39Unlock,
                        Verdict::Retry => UnlockState::PromptPassword,
                        Verdict::Reset => UnlockState::Done(UnlockOutcome::FactoryReset),
                    }
                }
                UnlockState::Bip39Unlock => {
                    self.unlock_bip39()?;
                    info!("device unlocked");
                    UnlockState::Done(UnlockOutcome::Unlocked)
                }
                UnlockState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn gate(&self) -> UnlockState {
        if !self.device.is_initialized() || !self.device.is_locked() {
            return UnlockState::Done(UnlockOutcome::NothingToUnlock);
        }
        UnlockState::PromptPassword
    }

    // The seed unlock blocks the device, so no screen can render while it
    // runs: draw both frames directly.
    fn play_unlock_animation(&mut self) {
        self.device.draw_image(LockImage::Locked);
        self.device.delay(UNLOCK_ANIMATION_HOLD);
        self.device.draw_image(LockImage::Unlocked);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
