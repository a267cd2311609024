//! `bulwark-workflow`: unlock workflow for BULWARK.
//!
//! Drives a locked device from "enter password" to an unlocked seed:
//! evaluates each attempt against the credential store, escalates to a
//! factory reset when the store reports exhausted attempts, and confirms
//! the optional mnemonic passphrase before unlocking the seed.
//!
//! All collaborators (store, screen, input, reset flow) are reached through
//! the traits in [`device`]; this crate owns no hardware and no storage.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod device;
pub mod error;
pub mod evaluator;
pub mod fatal;
pub mod passphrase;
pub mod preferences;
pub mod status;
pub mod workflow;

#[cfg(test)]
mod fixtures;

pub use device::{
    AttemptOutcome, CredentialStore, Device, DeviceMemory, FactoryReset, LockImage,
    UserInterface,
};
pub use error::{Fatal, WorkflowError};
pub use evaluator::{unlock_and_handle_error, Verdict};
pub use fatal::report_and_abort;
pub use passphrase::get_mnemonic_passphrase;
pub use preferences::Preferences;
pub use status::{status_message_for, StatusMessage, MAX_STATUS_MESSAGE_LENGTH};
pub use workflow::{UnlockOutcome, UnlockState, UnlockWorkflow, UNLOCK_ANIMATION_HOLD};
