//! User-visible texts and the bounded buffer status messages are built in.

use std::fmt::{self, Write};

/// Capacity of a formatted status message in bytes.
pub const MAX_STATUS_MESSAGE_LENGTH: usize = 100;

/// Title of the password prompt.
pub const ENTER_PASSWORD_TITLE: &str = "Enter password";

/// Title of the first passphrase prompt.
pub const ENTER_PASSPHRASE_TITLE: &str = "Enter\nmnemonic passphrase";

/// Title of the passphrase confirmation prompt.
pub const CONFIRM_PASSPHRASE_TITLE: &str = "Confirm\nmnemonic passphrase";

/// Shown when the two passphrase entries differ.
pub const PASSPHRASE_MISMATCH: &str = "Passphrases\ndo not match";

/// Shown before handing over to the factory reset flow.
pub const DEVICE_RESET: &str = "Device reset";

// ---------------------------------------------------------------------------
// StatusMessage
// ---------------------------------------------------------------------------

/// Fixed-capacity message buffer.
///
/// Implements [`fmt::Write`]; text beyond [`MAX_STATUS_MESSAGE_LENGTH`] is
/// dropped at the last character that fits and every later write is
/// ignored.
#[derive(Clone)]
pub struct StatusMessage {
    buf: [u8; MAX_STATUS_MESSAGE_LENGTH],
    len: usize,
    truncated: bool,
}

impl StatusMessage {
    /// An empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_STATUS_MESSAGE_LENGTH],
            len: 0,
            truncated: false,
        }
    }

    /// The message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Writes only ever stop on a char boundary.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Whether any input was cut off.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StatusMessage {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = MAX_STATUS_MESSAGE_LENGTH.saturating_sub(self.len);
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take = take.saturating_sub(1);
        }
        let end = self.len.saturating_add(take);
        self.buf[self.len..end].copy_from_slice(&s.as_bytes()[..take]);
        self.len = end;
        self.truncated = take < s.len();
        Ok(())
    }
}

impl fmt::Debug for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StatusMessage").field(&self.as_str()).finish()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message shown after a wrong password with `remaining_attempts` left.
#[must_use]
pub fn status_message_for(remaining_attempts: u8) -> StatusMessage {
    let mut msg = StatusMessage::new();
    // Writing into a `StatusMessage` cannot fail.
    let _ = if remaining_attempts == 1 {
        msg.write_str("Wrong password\n1 try remains")
    } else {
        write!(msg, "Wrong password\n{remaining_attempts} tries remain")
    };
    msg
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
