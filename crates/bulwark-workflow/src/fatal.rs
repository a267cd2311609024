//! Fatal-failure reporting path.
//!
//! Workflow operations return `Err(Fatal)` instead of aborting in place, so
//! every secret buffer in the unwound frames is wiped by its drop guard
//! before the process goes down. The top-level caller hands the error here.

use crate::error::Fatal;

/// Log `fatal` and abort the process. Never returns.
pub fn report_and_abort(fatal: &Fatal) -> ! {
    tracing::error!(error = %fatal, "unrecoverable unlock failure, aborting");
    std::process::abort()
}
