//! Mnemonic passphrase entry with confirmation.

use bulwark_secrets::Passphrase;
use tracing::debug;

use crate::device::UserInterface;
use crate::status::{CONFIRM_PASSPHRASE_TITLE, ENTER_PASSPHRASE_TITLE, PASSPHRASE_MISMATCH};

/// Ask for the passphrase twice until both entries match, then copy it
/// into `out`.
///
/// There is no attempt limit; every mismatch is reported once and the user
/// starts over. Both entry buffers are wiped at the end of each round.
pub fn get_mnemonic_passphrase<U: UserInterface + ?Sized>(ui: &mut U, out: &mut Passphrase) {
    let mut mismatches: u32 = 0;
    loop {
        let mut passphrase = Passphrase::new();
        let mut repeat = Passphrase::new();
        ui.enter_secret(ENTER_PASSPHRASE_TITLE, &mut passphrase);
        ui.enter_secret(CONFIRM_PASSPHRASE_TITLE, &mut repeat);
        if passphrase.ct_eq(&repeat) {
            out.copy_from(&passphrase);
            debug!(mismatches, "mnemonic passphrase confirmed");
            return;
        }
        mismatches = mismatches.saturating_add(1);
        ui.show_status(PASSPHRASE_MISMATCH, false);
    }
}
