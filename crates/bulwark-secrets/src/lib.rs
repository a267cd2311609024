//! `bulwark-secrets`: secret memory primitives for BULWARK.
//!
//! Every password and passphrase handled by the unlock workflow lives in a
//! fixed-capacity [`SecretText`] that zeroes itself on drop. Caller-owned
//! buffers that must be wiped before a scope ends are wrapped in a
//! [`WipeGuard`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;
pub mod text;

pub use error::SecretError;
pub use memory::{disable_core_dumps, LockedRegion, SecretBuffer};
pub use text::{constant_time_eq, Passphrase, Password, SecretText, WipeGuard, MAX_PASSWORD_LENGTH};
