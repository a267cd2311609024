//! Error types for `bulwark-secrets`.

use thiserror::Error;

/// Errors produced by secret memory operations.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Secure memory setup failure (mlock, core dump limits).
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
