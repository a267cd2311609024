//! Error types for `bulwark-sim`.

use bulwark_workflow::WorkflowError;
use thiserror::Error;

/// Errors from the simulator shell around the workflow.
///
/// Unlock failures are not listed here: the workflow reports them through
/// [`AttemptOutcome`](bulwark_workflow::AttemptOutcome) and
/// [`Fatal`](bulwark_workflow::Fatal).
#[derive(Debug, Error)]
pub enum SimError {
    /// The store record could not be created, read or erased.
    #[error("keystore error: {0}")]
    Keystore(String),

    /// The terminal stopped delivering input mid-flow.
    #[error("terminal input closed")]
    InputClosed,

    /// `--setup` on a device that already holds a credential.
    #[error("device is already initialized")]
    AlreadyInitialized,

    /// Preferences or secret-memory failure (delegated from bulwark-workflow).
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
