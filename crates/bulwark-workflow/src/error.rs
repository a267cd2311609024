//! Error types for `bulwark-workflow`.
//!
//! User mistakes (wrong password, mismatched passphrases) are not errors:
//! the workflow handles them by re-prompting. What remains is split in two:
//! [`Fatal`] for broken trust-state invariants, which must end the process,
//! and [`WorkflowError`] for ordinary I/O around the workflow.

use thiserror::Error;

/// Unrecoverable conditions. The caller must abort, see
/// [`report_and_abort`](crate::fatal::report_and_abort).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fatal {
    /// The store answered a password verification with something outside
    /// the known outcome set.
    #[error("keystore unlock failed: unexpected store response {code}")]
    UnexpectedStoreResponse {
        /// Diagnostic code reported by the store.
        code: i32,
    },

    /// Seed unlock failed although the password had just been verified.
    #[error("bip39 unlock failed")]
    SeedUnlockFailed,
}

/// Recoverable errors from the surroundings of the workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Preferences could not be encoded.
    #[error("preferences error: {0}")]
    Preferences(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_messages_name_the_failed_step() {
        let fault = Fatal::UnexpectedStoreResponse { code: -2 };
        assert_eq!(
            fault.to_string(),
            "keystore unlock failed: unexpected store response -2"
        );
        assert_eq!(Fatal::SeedUnlockFailed.to_string(), "bip39 unlock failed");
    }

    #[test]
    fn workflow_errors_render_their_source() {
        let io: WorkflowError = std::io::Error::other("disk gone").into();
        assert_eq!(io.to_string(), "I/O error: disk gone");
        assert_eq!(
            WorkflowError::Preferences("bad json".into()).to_string(),
            "preferences error: bad json"
        );
    }
}
